use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use walletbridge_core::config::DEFAULT_CONNECT_TIMEOUT;
use walletbridge_core::{AddressType, CoreError, Network, RpcConfig};

/// Query a btcwallet daemon through the wallet-controller contract.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct ConnectionArgs {
    /// RPC username.
    #[arg(short = 'u', long = "rpcuser", env = "WALLETBRIDGE_RPC_USER")]
    pub rpc_user: Option<String>,

    /// RPC password.
    #[arg(
        short = 'P',
        long = "rpcpass",
        env = "WALLETBRIDGE_RPC_PASS",
        hide_env_values = true
    )]
    pub rpc_pass: Option<String>,

    /// RPC server to connect to, as host[:port]. The port defaults per network.
    #[arg(
        short = 's',
        long = "rpcserver",
        default_value = "localhost",
        env = "WALLETBRIDGE_RPC_SERVER"
    )]
    pub rpc_server: String,

    /// RPC server certificate chain for validation.
    #[arg(short = 'c', long = "rpccert", env = "WALLETBRIDGE_RPC_CERT")]
    pub rpc_cert: Option<PathBuf>,

    /// Disable TLS.
    #[arg(long = "notls")]
    pub no_tls: bool,

    /// Do not verify TLS certificates (not recommended!).
    #[arg(long = "skipverify")]
    pub tls_skip_verify: bool,

    /// Connect via SOCKS5 proxy (eg. 127.0.0.1:9050).
    #[arg(long, env = "WALLETBRIDGE_PROXY")]
    pub proxy: Option<String>,

    /// Username for proxy server.
    #[arg(long = "proxyuser", env = "WALLETBRIDGE_PROXY_USER")]
    pub proxy_user: Option<String>,

    /// Password for proxy server.
    #[arg(long = "proxypass", env = "WALLETBRIDGE_PROXY_PASS", hide_env_values = true)]
    pub proxy_pass: Option<String>,

    /// Connect to testnet.
    #[arg(long)]
    pub testnet: bool,

    /// Connect to the simulation test network.
    #[arg(long)]
    pub simnet: bool,

    /// Connect to regtest.
    #[arg(long)]
    pub regtest: bool,

    /// Use the chain node's default port instead of the wallet's.
    #[arg(long)]
    pub node: bool,

    /// Per-request timeout in seconds.
    #[arg(long, default_value = "30", value_name = "SECS")]
    pub timeout: u64,
}

impl ConnectionArgs {
    pub fn to_config(&self) -> Result<RpcConfig, CoreError> {
        let network = Network::from_flags(self.testnet, self.simnet, self.regtest)?;
        let config = RpcConfig {
            rpc_server: self.rpc_server.clone(),
            rpc_user: self.rpc_user.clone(),
            rpc_pass: self.rpc_pass.clone(),
            rpc_cert: self.rpc_cert.clone(),
            no_tls: self.no_tls,
            tls_skip_verify: self.tls_skip_verify,
            proxy: self.proxy.clone(),
            proxy_user: self.proxy_user.clone(),
            proxy_pass: self.proxy_pass.clone(),
            network,
            wallet: !self.node,
            timeout: Duration::from_secs(self.timeout),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Sum of witness outputs with at least --minconf confirmations.
    Balance {
        /// Minimum confirmations; 0 includes mempool outputs.
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(i32).range(0..))]
        minconf: i32,
    },

    /// Derive a new receiving address.
    NewAddress {
        /// Address type: p2wkh (native witness) or np2wkh (nested in P2SH).
        #[arg(long = "type", default_value = "p2wkh")]
        address_type: AddressType,

        /// Request a change address. The wallet currently serves these from
        /// the receiving branch.
        #[arg(long)]
        change: bool,
    },

    /// List witness outputs with at least --minconf confirmations.
    ListUnspent {
        /// Minimum confirmations; 0 includes mempool outputs.
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(i32).range(0..))]
        minconf: i32,
    },
}
