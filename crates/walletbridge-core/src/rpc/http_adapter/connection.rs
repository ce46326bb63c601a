use std::path::Path;

use crate::config::RpcConfig;
use crate::error::CoreError;

/// Build the HTTP client for `config`: deadlines, TLS trust, and proxy.
pub(super) fn build_http_client(config: &RpcConfig) -> Result<reqwest::Client, CoreError> {
    let mut builder = reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.timeout)
        .tcp_nodelay(true);

    if !config.no_tls {
        if let Some(cert_path) = &config.rpc_cert {
            builder = builder.add_root_certificate(load_certificate(cert_path)?);
        }
        if config.tls_skip_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
    }

    if let Some(proxy_url) = config.proxy_url() {
        let mut proxy = reqwest::Proxy::all(&proxy_url)
            .map_err(|e| CoreError::Config(format!("invalid proxy `{proxy_url}`: {e}")))?;
        if let (Some(user), Some(pass)) = (&config.proxy_user, &config.proxy_pass) {
            proxy = proxy.basic_auth(user, pass);
        }
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| CoreError::Config(format!("build HTTP client: {e}")))
}

fn load_certificate(path: &Path) -> Result<reqwest::Certificate, CoreError> {
    let pem = std::fs::read(path).map_err(|e| {
        CoreError::Config(format!(
            "failed to read rpc certificate {}: {e}",
            path.display()
        ))
    })?;
    reqwest::Certificate::from_pem(&pem).map_err(|e| {
        CoreError::Config(format!(
            "rpc certificate {} is not valid PEM: {e}",
            path.display()
        ))
    })
}
