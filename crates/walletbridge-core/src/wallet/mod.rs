//! Wallet-controller contract and its btcwallet-backed implementation.
//!
//! [`WalletController`] is the full capability set the payment-channel layer
//! expects from a wallet. [`BtcWalletBridge`] implements the balance, address
//! and UTXO queries on top of any [`RpcTransport`](crate::rpc::RpcTransport);
//! the remaining operations fail with [`CoreError::NotImplemented`].

mod bridge;
mod decode;

pub use bridge::{BtcWalletBridge, DEFAULT_ACCOUNT};

use async_trait::async_trait;
use bitcoin::{Amount, OutPoint, PrivateKey, Transaction, TxOut, Txid};

use crate::error::CoreError;
use crate::types::{
    AddressType, SatPerVByte, SyncStatus, TransactionDetail, TransactionSubscription, Utxo,
    WalletAddress,
};

#[async_trait]
pub trait WalletController: Send + Sync {
    /// Look up an output the wallet knows about.
    async fn fetch_input_info(&self, prev_out: &OutPoint) -> Result<TxOut, CoreError>;

    /// Sum of all witness outputs with at least `min_confs` confirmations.
    /// Zero includes outputs still in the mempool.
    async fn confirmed_balance(&self, min_confs: i32) -> Result<Amount, CoreError>;

    /// Next address of `address_type`. `change` selects the internal branch
    /// where the backend supports it.
    async fn new_address(
        &self,
        address_type: AddressType,
        change: bool,
    ) -> Result<WalletAddress, CoreError>;

    async fn get_priv_key(&self, address: &WalletAddress) -> Result<PrivateKey, CoreError>;

    /// Fund, sign and broadcast a transaction paying `outputs`.
    async fn send_outputs(
        &self,
        outputs: &[TxOut],
        fee_rate: SatPerVByte,
    ) -> Result<Txid, CoreError>;

    /// All unspent outputs paying to witness programs, directly or nested in
    /// P2SH, with at least `min_confs` confirmations.
    async fn list_unspent_witness(&self, min_confs: i32) -> Result<Vec<Utxo>, CoreError>;

    async fn list_transaction_details(&self) -> Result<Vec<TransactionDetail>, CoreError>;

    async fn lock_outpoint(&self, outpoint: OutPoint) -> Result<(), CoreError>;

    async fn unlock_outpoint(&self, outpoint: OutPoint) -> Result<(), CoreError>;

    async fn publish_transaction(&self, tx: &Transaction) -> Result<(), CoreError>;

    async fn subscribe_transactions(&self) -> Result<TransactionSubscription, CoreError>;

    async fn is_synced(&self) -> Result<SyncStatus, CoreError>;

    async fn start(&self) -> Result<(), CoreError>;

    async fn stop(&self) -> Result<(), CoreError>;

    /// Short name of the wallet backend.
    fn back_end(&self) -> &'static str;
}
