use std::sync::Arc;

use async_trait::async_trait;
use bitcoin::{Amount, OutPoint, PrivateKey, Transaction, TxOut, Txid};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Network;
use crate::error::{CoreError, TransportError};
use crate::rpc::RpcTransport;
use crate::types::{
    AddressType, SatPerVByte, SyncStatus, TransactionDetail, TransactionSubscription,
    UnspentOutput, Utxo, WalletAddress, WalletQuery,
};

use super::decode::normalize_unspent;
use super::WalletController;

/// Wallet account new addresses are drawn from.
pub const DEFAULT_ACCOUNT: &str = "default";

// ==============================================================================
// BtcWalletBridge
// ==============================================================================

/// [`WalletController`] backed by a btcwallet daemon over JSON-RPC.
///
/// Stateless apart from the transport and the network it was built for.
/// Every operation performs at most one RPC round trip.
pub struct BtcWalletBridge {
    rpc: Arc<dyn RpcTransport>,
    network: Network,
}

impl BtcWalletBridge {
    pub fn new(rpc: Arc<dyn RpcTransport>, network: Network) -> Self {
        Self { rpc, network }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Raw `listunspent` records matching `query`, in daemon order.
    pub async fn list_unspent(&self, query: &WalletQuery) -> Result<Vec<UnspentOutput>, CoreError> {
        let outputs: Option<Vec<UnspentOutput>> =
            self.call("listunspent", query.to_params()).await?;
        Ok(outputs.unwrap_or_default())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<T, CoreError> {
        let raw = self.rpc.call(method, params).await?;
        let decoded = serde_json::from_str(raw.get()).map_err(|e| {
            TransportError::InvalidResponse(format!("invalid {method} result: {e}"))
        })?;
        Ok(decoded)
    }
}

#[async_trait]
impl WalletController for BtcWalletBridge {
    async fn fetch_input_info(&self, _prev_out: &OutPoint) -> Result<TxOut, CoreError> {
        Err(CoreError::NotImplemented("fetch_input_info"))
    }

    async fn confirmed_balance(&self, min_confs: i32) -> Result<Amount, CoreError> {
        let outputs = self.list_unspent_witness(min_confs).await?;

        outputs.iter().try_fold(Amount::ZERO, |total, utxo| {
            total.checked_add(utxo.value).ok_or_else(|| {
                CoreError::AmountConversion(format!(
                    "balance overflow adding {} to {total}",
                    utxo.value
                ))
            })
        })
    }

    async fn new_address(
        &self,
        address_type: AddressType,
        change: bool,
    ) -> Result<WalletAddress, CoreError> {
        let scope = address_type.derivation_scope()?;

        // btcwallet exposes no internal-branch RPC, so change requests are
        // served from the external branch.
        if change {
            debug!(%scope, "change address requested; deriving from the external branch");
        }

        let address: String = self
            .call(
                "getnewaddress",
                vec![
                    serde_json::json!(DEFAULT_ACCOUNT),
                    serde_json::json!(scope.rpc_address_type()),
                ],
            )
            .await?;

        let address = WalletAddress {
            address,
            address_type,
        };
        if let Some(network) = self.network.bitcoin_network() {
            address.to_address(network)?;
        }

        debug!(%scope, address = %address, "derived new address");
        Ok(address)
    }

    async fn get_priv_key(&self, _address: &WalletAddress) -> Result<PrivateKey, CoreError> {
        Err(CoreError::NotImplemented("get_priv_key"))
    }

    async fn send_outputs(
        &self,
        _outputs: &[TxOut],
        _fee_rate: SatPerVByte,
    ) -> Result<Txid, CoreError> {
        Err(CoreError::NotImplemented("send_outputs"))
    }

    async fn list_unspent_witness(&self, min_confs: i32) -> Result<Vec<Utxo>, CoreError> {
        let unspent = self
            .list_unspent(&WalletQuery::min_confirmations(min_confs))
            .await?;

        let mut witness_outputs = Vec::with_capacity(unspent.len());
        for output in &unspent {
            if let Some(utxo) = normalize_unspent(output)? {
                witness_outputs.push(utxo);
            }
        }

        debug!(
            min_confs,
            listed = unspent.len(),
            witness = witness_outputs.len(),
            "listed witness outputs"
        );
        Ok(witness_outputs)
    }

    async fn list_transaction_details(&self) -> Result<Vec<TransactionDetail>, CoreError> {
        Err(CoreError::NotImplemented("list_transaction_details"))
    }

    async fn lock_outpoint(&self, _outpoint: OutPoint) -> Result<(), CoreError> {
        Err(CoreError::NotImplemented("lock_outpoint"))
    }

    async fn unlock_outpoint(&self, _outpoint: OutPoint) -> Result<(), CoreError> {
        Err(CoreError::NotImplemented("unlock_outpoint"))
    }

    async fn publish_transaction(&self, _tx: &Transaction) -> Result<(), CoreError> {
        Err(CoreError::NotImplemented("publish_transaction"))
    }

    async fn subscribe_transactions(&self) -> Result<TransactionSubscription, CoreError> {
        Err(CoreError::NotImplemented("subscribe_transactions"))
    }

    async fn is_synced(&self) -> Result<SyncStatus, CoreError> {
        Err(CoreError::NotImplemented("is_synced"))
    }

    async fn start(&self) -> Result<(), CoreError> {
        Err(CoreError::NotImplemented("start"))
    }

    async fn stop(&self) -> Result<(), CoreError> {
        Err(CoreError::NotImplemented("stop"))
    }

    fn back_end(&self) -> &'static str {
        "btcwallet"
    }
}
