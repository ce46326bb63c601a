//! Wallet daemon RPC transport.
//!
//! Defines the [`RpcTransport`] trait and provides an HTTP JSON-RPC
//! implementation ([`HttpRpcClient`]) plus a test mock (`mock::MockTransport`).

mod http_adapter;
#[cfg(test)]
pub mod mock;

pub use http_adapter::HttpRpcClient;

use async_trait::async_trait;
use serde_json::value::RawValue;

use crate::error::TransportError;

/// A single named remote call with positional parameters.
///
/// Implementations own endpoint, credentials and TLS settings, all fixed at
/// construction. Each call is independent: no retries, no shared state
/// beyond what the implementation needs to number requests.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Perform `method(params...)` and return the `result` payload exactly
    /// as the daemon sent it.
    async fn call(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<Box<RawValue>, TransportError>;
}
