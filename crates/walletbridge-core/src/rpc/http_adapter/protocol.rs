use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

use crate::error::TransportError;

/// btcwallet speaks JSON-RPC 1.0.
pub(super) const JSONRPC_VERSION: &str = "1.0";

#[derive(serde::Serialize)]
pub(super) struct JsonRpcRequest<'a> {
    pub(super) jsonrpc: &'static str,
    pub(super) id: u64,
    pub(super) method: &'a str,
    pub(super) params: Vec<serde_json::Value>,
}

/// Response envelope. `result` is `None` only when the key is absent; an
/// explicit `null` is kept as a raw `null` payload.
#[derive(Deserialize)]
pub(super) struct JsonRpcResponse {
    #[serde(default, deserialize_with = "present_raw")]
    pub(super) result: Option<Box<RawValue>>,
    #[serde(default)]
    pub(super) error: Option<serde_json::Value>,
}

fn present_raw<'de, D>(deserializer: D) -> Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
}

/// Map a JSON-RPC error member to a `ServerError`. Error members without a
/// numeric `code` and string `message` are reported as `InvalidResponse`.
pub(super) fn parse_jsonrpc_error(err: &serde_json::Value) -> TransportError {
    match ErrorObject::deserialize(err) {
        Ok(ErrorObject { code, message }) => TransportError::ServerError { code, message },
        Err(_) => TransportError::InvalidResponse(format!("malformed error member: {err}")),
    }
}

/// Decode a response body into the raw `result` payload.
///
/// A JSON-RPC error member always wins. Otherwise any non-success status is
/// reported as `Status`, whatever the body looks like: btcwallet answers
/// bad credentials with plain text and proxies answer with arbitrary JSON.
pub(super) fn decode_response(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<Box<RawValue>, TransportError> {
    let status_error = || TransportError::Status {
        status: status.as_u16(),
        body: body.trim().to_owned(),
    };

    let decoded: JsonRpcResponse = match serde_json::from_str(body) {
        Ok(decoded) => decoded,
        Err(_) if !status.is_success() => return Err(status_error()),
        Err(e) => {
            return Err(TransportError::InvalidResponse(format!(
                "decode JSON-RPC response: {e}; body={body}"
            )));
        }
    };

    if let Some(err) = decoded.error.as_ref().filter(|err| !err.is_null()) {
        return Err(parse_jsonrpc_error(err));
    }
    if !status.is_success() {
        return Err(status_error());
    }

    decoded.result.ok_or_else(|| {
        TransportError::InvalidResponse(format!("response has neither result nor error: {body}"))
    })
}
