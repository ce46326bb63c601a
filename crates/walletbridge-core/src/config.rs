//! Connection settings for the wallet daemon.
//!
//! An [`RpcConfig`] is resolved once (normally by the CLI) and handed to
//! the transport at construction. Nothing in the crate mutates it afterwards.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ==============================================================================
// Network
// ==============================================================================

/// Chain the wallet daemon is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet3,
    Simnet,
    Regtest,
}

impl Network {
    /// Pick a network from mutually exclusive command-line switches.
    pub fn from_flags(testnet: bool, simnet: bool, regtest: bool) -> Result<Self, CoreError> {
        match (testnet, simnet, regtest) {
            (false, false, false) => Ok(Self::Mainnet),
            (true, false, false) => Ok(Self::Testnet3),
            (false, true, false) => Ok(Self::Simnet),
            (false, false, true) => Ok(Self::Regtest),
            _ => Err(CoreError::Config(
                "the testnet, simnet and regtest options are mutually exclusive".to_owned(),
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet3 => "testnet3",
            Self::Simnet => "simnet",
            Self::Regtest => "regtest",
        }
    }

    /// The matching `bitcoin` crate network. Simnet has no counterpart there,
    /// so addresses on it cannot be checked.
    pub fn bitcoin_network(&self) -> Option<bitcoin::Network> {
        match self {
            Self::Mainnet => Some(bitcoin::Network::Bitcoin),
            Self::Testnet3 => Some(bitcoin::Network::Testnet),
            Self::Simnet => None,
            Self::Regtest => Some(bitcoin::Network::Regtest),
        }
    }

    /// Default RPC port for the wallet daemon (`wallet = true`) or the
    /// chain node it sits in front of.
    pub fn default_rpc_port(&self, wallet: bool) -> u16 {
        match (self, wallet) {
            (Self::Mainnet, true) => 8332,
            (Self::Testnet3 | Self::Regtest, true) => 18332,
            (Self::Simnet, true) => 18554,
            (Self::Mainnet, false) => 8334,
            (Self::Testnet3 | Self::Regtest, false) => 18334,
            (Self::Simnet, false) => 18556,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ==============================================================================
// RPC Config
// ==============================================================================

/// Default per-request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default TCP/TLS connect deadline.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct RpcConfig {
    /// `host` or `host:port`; IPv6 hosts must be bracketed.
    pub rpc_server: String,
    pub rpc_user: Option<String>,
    pub rpc_pass: Option<String>,
    /// PEM certificate chain used to validate the daemon's TLS certificate.
    pub rpc_cert: Option<PathBuf>,
    pub no_tls: bool,
    pub tls_skip_verify: bool,
    /// SOCKS5 proxy as `host:port`.
    pub proxy: Option<String>,
    pub proxy_user: Option<String>,
    pub proxy_pass: Option<String>,
    pub network: Network,
    /// Connect to the wallet daemon rather than the chain node. Only affects
    /// the default port.
    pub wallet: bool,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            rpc_server: "localhost".to_owned(),
            rpc_user: None,
            rpc_pass: None,
            rpc_cert: None,
            no_tls: false,
            tls_skip_verify: false,
            proxy: None,
            proxy_user: None,
            proxy_pass: None,
            network: Network::Mainnet,
            wallet: true,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl fmt::Debug for RpcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcConfig")
            .field("rpc_server", &self.rpc_server)
            .field("rpc_user", &self.rpc_user)
            .field("rpc_pass", &self.rpc_pass.as_ref().map(|_| "<redacted>"))
            .field("rpc_cert", &self.rpc_cert)
            .field("no_tls", &self.no_tls)
            .field("tls_skip_verify", &self.tls_skip_verify)
            .field("proxy", &self.proxy)
            .field("proxy_user", &self.proxy_user)
            .field("proxy_pass", &self.proxy_pass.as_ref().map(|_| "<redacted>"))
            .field("network", &self.network)
            .field("wallet", &self.wallet)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl RpcConfig {
    /// Check option combinations that cannot work together.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.rpc_server.trim().is_empty() {
            return Err(CoreError::Config("rpc server must not be empty".to_owned()));
        }
        require_pair(&self.rpc_user, &self.rpc_pass, "rpc user", "rpc pass")?;
        require_pair(&self.proxy_user, &self.proxy_pass, "proxy user", "proxy pass")?;
        if self.proxy.is_none() && self.proxy_user.is_some() {
            return Err(CoreError::Config(
                "proxy credentials were given without a proxy".to_owned(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(CoreError::Config("rpc timeout must be non-zero".to_owned()));
        }
        Ok(())
    }

    /// Credentials for HTTP basic auth, if configured.
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.rpc_user, &self.rpc_pass) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        }
    }

    /// Full endpoint URL: scheme from the TLS setting, port defaulted from
    /// network and wallet flag when `rpc_server` has none.
    pub fn endpoint_url(&self) -> Result<String, CoreError> {
        let server = self.rpc_server.trim();
        if server.contains("://") {
            return Err(CoreError::Config(format!(
                "rpc server `{server}` must be host[:port] without a scheme"
            )));
        }

        let scheme = if self.no_tls { "http" } else { "https" };
        let raw = if has_explicit_port(server) {
            format!("{scheme}://{server}/")
        } else {
            let port = self.network.default_rpc_port(self.wallet);
            format!("{scheme}://{server}:{port}/")
        };

        let url = Url::parse(&raw)
            .map_err(|e| CoreError::Config(format!("invalid rpc server `{server}`: {e}")))?;
        Ok(url.to_string())
    }

    /// Proxy URL for `reqwest`, if a proxy is configured.
    pub fn proxy_url(&self) -> Option<String> {
        self.proxy.as_ref().map(|proxy| {
            if proxy.contains("://") {
                proxy.clone()
            } else {
                format!("socks5://{proxy}")
            }
        })
    }
}

fn require_pair(
    first: &Option<String>,
    second: &Option<String>,
    first_name: &str,
    second_name: &str,
) -> Result<(), CoreError> {
    match (first, second) {
        (Some(_), None) | (None, Some(_)) => Err(CoreError::Config(format!(
            "both {first_name} and {second_name} must be set together"
        ))),
        _ => Ok(()),
    }
}

fn has_explicit_port(server: &str) -> bool {
    let Some((host, port)) = server.rsplit_once(':') else {
        return false;
    };
    let numeric = !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit());
    // A bare IPv6 literal has colons but no port.
    numeric && (!host.contains(':') || host.ends_with(']'))
}
