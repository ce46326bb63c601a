mod cli;

use std::sync::Arc;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde_json::json;

use walletbridge_core::rpc::HttpRpcClient;
use walletbridge_core::{BtcWalletBridge, CoreError, WalletController};

use cli::Command;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let config = args
        .connection
        .to_config()
        .wrap_err("resolve rpc configuration")?;
    let rpc = HttpRpcClient::new(&config).wrap_err("build wallet rpc client")?;
    let url = rpc.url().to_owned();
    tracing::debug!(rpc.url = %url, network = %config.network, "wallet rpc client ready");

    let bridge = BtcWalletBridge::new(Arc::new(rpc), config.network);

    let output = run(&bridge, args.command).await.map_err(|err| {
        let message = format_rpc_error(&url, &err);
        eyre!(message).wrap_err("wallet request failed")
    })?;

    let rendered = serde_json::to_string_pretty(&output).wrap_err("render JSON output")?;
    println!("{rendered}");
    Ok(())
}

async fn run(
    wallet: &dyn WalletController,
    command: Command,
) -> Result<serde_json::Value, CoreError> {
    match command {
        Command::Balance { minconf } => {
            let balance = wallet.confirmed_balance(minconf).await?;
            tracing::info!(minconf, %balance, "computed confirmed balance");
            Ok(json!({
                "min_confirmations": minconf,
                "balance_sat": balance.to_sat(),
                "balance_btc": balance.to_btc(),
            }))
        }
        Command::NewAddress {
            address_type,
            change,
        } => {
            let address = wallet.new_address(address_type, change).await?;
            tracing::info!(%address, %address_type, "derived new address");
            Ok(json!({
                "address": address.as_str(),
                "address_type": address.address_type,
                "change": change,
            }))
        }
        Command::ListUnspent { minconf } => {
            let utxos = wallet.list_unspent_witness(minconf).await?;
            tracing::info!(minconf, count = utxos.len(), "listed witness outputs");
            Ok(json!(utxos))
        }
    }
}

/// Render a failed request with a hint for the common connection problems.
fn format_rpc_error(rpc_url: &str, err: &CoreError) -> String {
    let source_error = err.to_string();
    let mut lines = vec![
        format!("request to wallet RPC endpoint `{rpc_url}` failed"),
        format!("error: {source_error}"),
    ];

    if source_error.contains("HTTP status 401") || source_error.contains("HTTP status 403") {
        lines.push("hint: authentication failed; verify --rpcuser/--rpcpass".into());
    } else if source_error.contains("certificate")
        || source_error.contains("tls")
        || source_error.contains("SSL")
    {
        lines.push(
            "hint: TLS handshake failed; pass the wallet's certificate with --rpccert, \
             or use --notls if the wallet serves plain HTTP"
                .into(),
        );
    } else if source_error.contains("dns error") {
        lines.push("hint: hostname resolution failed; verify --rpcserver".into());
    } else if source_error.contains("error sending request for url") {
        lines.push(
            "hint: request could not be sent; verify the wallet is running and the network \
             flag (--testnet/--simnet/--regtest) matches its port"
                .into(),
        );
    } else if matches!(err, CoreError::UnsupportedAddressType(_)) {
        lines.push("hint: supported address types are p2wkh and np2wkh".into());
    }

    lines.join("\n")
}
