/// Failures raised while talking to the wallet daemon.
///
/// These are surfaced verbatim to the caller; the transport never retries.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, TLS, proxy, timeout, or body-read failure.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The daemon answered with a non-success status and no JSON-RPC body
    /// (btcwallet answers bad credentials with a bare 401).
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// The daemon answered with a JSON-RPC error object.
    #[error("server error {code}: {message}")]
    ServerError { code: i64, message: String },

    /// The daemon answered with something that is not a JSON-RPC response,
    /// or with a result of the wrong shape.
    #[error("invalid RPC response: {0}")]
    InvalidResponse(String),

    /// The request could not be built, so nothing was sent.
    #[error("invalid RPC request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("RPC communication failure: {0}")]
    Transport(#[from] TransportError),

    #[error("invalid locking script: {0}")]
    ScriptDecode(String),

    #[error("invalid transaction id: {0}")]
    HashParse(String),

    #[error("invalid amount: {0}")]
    AmountConversion(String),

    #[error("unsupported address type: {0}")]
    UnsupportedAddressType(String),

    #[error("{0} is not implemented by this wallet backend")]
    NotImplemented(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),
}
