use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::header;
use serde_json::value::RawValue;
use tracing::{debug, trace};

use crate::config::RpcConfig;
use crate::error::{CoreError, TransportError};

use super::super::RpcTransport;
use super::connection::build_http_client;
use super::protocol::{decode_response, JsonRpcRequest, JSONRPC_VERSION};

/// btcwallet JSON-RPC client over HTTP(S).
///
/// Holds only configuration resolved at construction and a request-id
/// counter, so one client can be shared across tasks behind an `Arc`.
pub struct HttpRpcClient {
    client: reqwest::Client,
    url: String,
    auth: Option<(String, String)>,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    /// Create a client from a validated-on-entry configuration.
    ///
    /// The endpoint scheme follows `no_tls`; when `rpc_cert` is set it is
    /// added as a trusted root. Per-call deadlines come from
    /// `timeout`/`connect_timeout` and expire as `TransportError::Http`.
    pub fn new(config: &RpcConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let url = config.endpoint_url()?;
        let client = build_http_client(config)?;

        debug!(
            rpc.url = %url,
            network = %config.network,
            tls = !config.no_tls,
            proxy = config.proxy.is_some(),
            "configured wallet rpc client"
        );

        Ok(Self {
            client,
            url,
            auth: config.credentials(),
            next_id: AtomicU64::new(initial_request_id()),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn reserve_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn call(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<Box<RawValue>, TransportError> {
        if method.is_empty() {
            return Err(TransportError::InvalidRequest(
                "method name must not be empty".to_owned(),
            ));
        }

        let id = self.reserve_request_id();
        debug!(
            rpc.id = id,
            rpc.method = method,
            rpc.params = params.len(),
            "rpc call"
        );
        let req = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        };

        let mut builder = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&req);
        if let Some((ref user, ref pass)) = self.auth {
            builder = builder.basic_auth(user, Some(pass));
        }

        let response = builder.send().await?;
        let status = response.status();

        let body = response.text().await?;
        debug!(rpc.id = id, rpc.method = method, %status, body_len = body.len(), "rpc response");
        trace!(rpc.id = id, rpc.method = method, body = %body, "rpc response body");

        decode_response(status, &body)
    }
}

fn initial_request_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
