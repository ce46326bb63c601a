use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::value::RawValue;

use crate::error::TransportError;
use crate::types::UnspentOutput;

use super::RpcTransport;

/// A mock wallet daemon for testing. Serves canned `listunspent` records
/// (filtered by the requested confirmation range, as the daemon would) and
/// `getnewaddress` results, and records every call it receives.
pub struct MockTransport {
    unspent: Vec<UnspentOutput>,
    new_address: String,
    fail_with: Option<(i64, String)>,
    calls: Mutex<Vec<(String, Vec<serde_json::Value>)>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            unspent: Vec::new(),
            new_address: "bcrt1qw508d6qejxtdg4y5r3zarvary0c5xw7kygt080".to_owned(),
            fail_with: None,
        }
    }

    /// Every `(method, params)` pair received so far, in order.
    pub fn calls(&self) -> Vec<(String, Vec<serde_json::Value>)> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    fn list_unspent(&self, params: &[serde_json::Value]) -> serde_json::Value {
        let min = params.first().and_then(serde_json::Value::as_i64).unwrap_or(1);
        let max = params
            .get(1)
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(i64::from(i32::MAX));
        let matching: Vec<&UnspentOutput> = self
            .unspent
            .iter()
            .filter(|output| output.confirmations >= min && output.confirmations <= max)
            .collect();
        serde_json::to_value(matching).expect("unspent records serialize")
    }
}

pub struct MockTransportBuilder {
    unspent: Vec<UnspentOutput>,
    new_address: String,
    fail_with: Option<(i64, String)>,
}

impl MockTransportBuilder {
    pub fn with_unspent(mut self, output: UnspentOutput) -> Self {
        self.unspent.push(output);
        self
    }

    pub fn with_new_address(mut self, address: &str) -> Self {
        self.new_address = address.to_owned();
        self
    }

    /// Answer every call with a JSON-RPC server error.
    pub fn failing(mut self, code: i64, message: &str) -> Self {
        self.fail_with = Some((code, message.to_owned()));
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            unspent: self.unspent,
            new_address: self.new_address,
            fail_with: self.fail_with,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn call(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<Box<RawValue>, TransportError> {
        self.calls
            .lock()
            .expect("mock call log poisoned")
            .push((method.to_owned(), params.clone()));

        if let Some((code, message)) = &self.fail_with {
            return Err(TransportError::ServerError {
                code: *code,
                message: message.clone(),
            });
        }

        let result = match method {
            "listunspent" => self.list_unspent(&params),
            "getnewaddress" => serde_json::json!(self.new_address),
            other => {
                return Err(TransportError::ServerError {
                    code: -32601,
                    message: format!("Method not found: {other}"),
                })
            }
        };
        Ok(serde_json::value::to_raw_value(&result).expect("mock result serializes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    #[tokio::test]
    async fn list_unspent_filters_by_confirmation_range() {
        let rpc = MockTransport::builder()
            .with_unspent(witness_unspent(1, 0, 0.1, 0))
            .with_unspent(witness_unspent(2, 0, 0.2, 3))
            .with_unspent(witness_unspent(3, 0, 0.3, 10))
            .build();

        let raw = rpc
            .call(
                "listunspent",
                vec![serde_json::json!(1), serde_json::json!(5)],
            )
            .await
            .unwrap();
        let outputs: Vec<UnspentOutput> = serde_json::from_str(raw.get()).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].txid, txid_hex(2));
        assert_eq!(rpc.calls().len(), 1);
    }

    #[tokio::test]
    async fn unknown_method_is_server_error() {
        let rpc = MockTransport::builder().build();
        let err = rpc.call("walletpassphrase", Vec::new()).await.unwrap_err();
        assert!(matches!(err, TransportError::ServerError { code: -32601, .. }));
    }
}
