//! Domain and wire types for the wallet adapter.
//!
//! `UnspentOutput` mirrors one `listunspent` record as the daemon sends it;
//! `Utxo` is the normalized form handed to the channel layer.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use bitcoin::address::NetworkUnchecked;
use bitcoin::{Address, Amount, OutPoint, ScriptBuf};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::{CoreError, TransportError};

// ==============================================================================
// Address Type
// ==============================================================================

/// Spending template of a wallet output or requested address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressType {
    /// Native P2WPKH.
    WitnessPubKey,
    /// P2WPKH nested in P2SH.
    NestedWitnessPubKey,
    /// Anything the channel layer cannot fund from.
    Unknown,
}

impl AddressType {
    pub fn is_witness(&self) -> bool {
        matches!(self, Self::WitnessPubKey | Self::NestedWitnessPubKey)
    }

    /// Key derivation scope new addresses of this type come from.
    pub fn derivation_scope(&self) -> Result<DerivationScope, CoreError> {
        match self {
            Self::WitnessPubKey => Ok(DerivationScope::Bip0084),
            Self::NestedWitnessPubKey => Ok(DerivationScope::Bip0049Plus),
            Self::Unknown => Err(CoreError::UnsupportedAddressType(self.to_string())),
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WitnessPubKey => write!(f, "p2wkh"),
            Self::NestedWitnessPubKey => write!(f, "np2wkh"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Parses the short labels used on the command line. Unrecognized labels map
/// to [`AddressType::Unknown`] so the adapter reports them uniformly.
impl FromStr for AddressType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "p2wkh" | "p2wpkh" | "bech32" => Self::WitnessPubKey,
            "np2wkh" | "np2wpkh" | "p2sh-segwit" => Self::NestedWitnessPubKey,
            _ => Self::Unknown,
        })
    }
}

// ==============================================================================
// Derivation Scope
// ==============================================================================

/// Key-generation namespace inside the wallet daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivationScope {
    /// purpose 84', native witness addresses.
    Bip0084,
    /// purpose 49', witness addresses nested in P2SH.
    Bip0049Plus,
}

impl DerivationScope {
    pub fn purpose(&self) -> u32 {
        match self {
            Self::Bip0084 => 84,
            Self::Bip0049Plus => 49,
        }
    }

    pub fn coin(&self) -> u32 {
        0
    }

    /// Address-type argument `getnewaddress` expects for this scope.
    pub fn rpc_address_type(&self) -> &'static str {
        match self {
            Self::Bip0084 => "bech32",
            Self::Bip0049Plus => "p2sh-segwit",
        }
    }
}

impl fmt::Display for DerivationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m/{}'/{}'", self.purpose(), self.coin())
    }
}

// ==============================================================================
// Wallet Query
// ==============================================================================

/// Filter for `listunspent`. Both confirmation bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletQuery {
    pub min_confirmations: i32,
    pub max_confirmations: i32,
    pub addresses: Option<BTreeSet<String>>,
}

impl WalletQuery {
    /// Everything with at least `min_confirmations`, no address filter.
    pub fn min_confirmations(min_confirmations: i32) -> Self {
        Self {
            min_confirmations,
            max_confirmations: i32::MAX,
            addresses: None,
        }
    }

    pub fn with_addresses(mut self, addresses: impl IntoIterator<Item = String>) -> Self {
        self.addresses = Some(addresses.into_iter().collect());
        self
    }

    /// Positional parameters for `listunspent`.
    pub fn to_params(&self) -> Vec<serde_json::Value> {
        let mut params = vec![
            serde_json::json!(self.min_confirmations),
            serde_json::json!(self.max_confirmations),
        ];
        if let Some(addresses) = &self.addresses {
            params.push(serde_json::json!(addresses));
        }
        params
    }
}

impl Default for WalletQuery {
    fn default() -> Self {
        Self::min_confirmations(0)
    }
}

// ==============================================================================
// Unspent Output (wire)
// ==============================================================================

/// One record of a `listunspent` result, undecoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnspentOutput {
    pub txid: String,
    pub vout: u32,
    /// Decimal BTC; a JSON number from btcwallet, a string from some proxies.
    pub amount: serde_json::Value,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: String,
    pub confirmations: i64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default = "default_spendable")]
    pub spendable: bool,
}

fn default_spendable() -> bool {
    true
}

// ==============================================================================
// Normalized UTXO
// ==============================================================================

/// A witness-spendable output the wallet controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub address_type: AddressType,
    pub value: Amount,
    pub pk_script: ScriptBuf,
    pub outpoint: OutPoint,
}

// ==============================================================================
// Wallet Address
// ==============================================================================

/// Address handed out by the daemon, kept in its encoded form because
/// some daemon networks (simnet) have no `bitcoin::Network` equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAddress {
    pub address: String,
    pub address_type: AddressType,
}

impl WalletAddress {
    pub fn as_str(&self) -> &str {
        &self.address
    }

    /// Parse and check the address against `network`.
    pub fn to_address(&self, network: bitcoin::Network) -> Result<Address, CoreError> {
        let unchecked: Address<NetworkUnchecked> = self.address.parse().map_err(|e| {
            TransportError::InvalidResponse(format!("invalid address `{}`: {e}", self.address))
        })?;
        let checked = unchecked.require_network(network).map_err(|e| {
            TransportError::InvalidResponse(format!(
                "address `{}` is not valid for {network}: {e}",
                self.address
            ))
        })?;
        Ok(checked)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

// ==============================================================================
// Placeholder Types for Unimplemented Controller Operations
// ==============================================================================

/// Fee rate for `send_outputs`, in satoshis per virtual byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SatPerVByte(pub u64);

/// A wallet transaction as reported by `list_transaction_details`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDetail {
    pub hash: bitcoin::Txid,
    /// Net change to the wallet balance, in satoshis.
    pub value: bitcoin::SignedAmount,
    pub num_confirmations: i32,
    pub block_hash: Option<bitcoin::BlockHash>,
    pub block_height: Option<i32>,
    pub timestamp: i64,
    pub total_fees: i64,
}

/// Streams of wallet transactions as they appear and confirm.
#[derive(Debug)]
pub struct TransactionSubscription {
    pub confirmed: mpsc::Receiver<TransactionDetail>,
    pub unconfirmed: mpsc::Receiver<TransactionDetail>,
}

/// Result of `is_synced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    pub synced: bool,
    /// Timestamp of the best block the wallet has seen.
    pub best_timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_type_maps_to_scope() {
        assert_eq!(
            AddressType::WitnessPubKey.derivation_scope().unwrap(),
            DerivationScope::Bip0084
        );
        assert_eq!(
            AddressType::NestedWitnessPubKey.derivation_scope().unwrap(),
            DerivationScope::Bip0049Plus
        );
        assert!(matches!(
            AddressType::Unknown.derivation_scope(),
            Err(CoreError::UnsupportedAddressType(_))
        ));
    }

    #[test]
    fn address_type_labels_parse() {
        assert_eq!("p2wkh".parse::<AddressType>().unwrap(), AddressType::WitnessPubKey);
        assert_eq!(
            "NP2WKH".parse::<AddressType>().unwrap(),
            AddressType::NestedWitnessPubKey
        );
        assert_eq!("p2pkh".parse::<AddressType>().unwrap(), AddressType::Unknown);
    }

    #[test]
    fn scope_display_is_derivation_prefix() {
        assert_eq!(DerivationScope::Bip0084.to_string(), "m/84'/0'");
        assert_eq!(DerivationScope::Bip0049Plus.to_string(), "m/49'/0'");
    }

    #[test]
    fn query_params_omit_missing_address_filter() {
        let params = WalletQuery::min_confirmations(3).to_params();
        assert_eq!(params, vec![serde_json::json!(3), serde_json::json!(i32::MAX)]);

        let params = WalletQuery::min_confirmations(0)
            .with_addresses(["bcrt1qexample".to_owned()])
            .to_params();
        assert_eq!(params.len(), 3);
        assert_eq!(params[2], serde_json::json!(["bcrt1qexample"]));
    }

    #[test]
    fn unspent_output_decodes_btcwallet_record() {
        let raw = serde_json::json!({
            "txid": "aa".repeat(32),
            "vout": 1,
            "address": "sb1qexample",
            "account": "default",
            "scriptPubKey": "0014".to_owned() + &"11".repeat(20),
            "amount": 0.5,
            "confirmations": 6,
            "spendable": true
        });
        let output: UnspentOutput = serde_json::from_value(raw).expect("record must decode");
        assert_eq!(output.vout, 1);
        assert_eq!(output.confirmations, 6);
        assert_eq!(output.account.as_deref(), Some("default"));
    }

    fn transaction_detail(byte: u8, confirmations: i32) -> TransactionDetail {
        use bitcoin::hashes::Hash;

        TransactionDetail {
            hash: bitcoin::Txid::from_byte_array([byte; 32]),
            value: bitcoin::SignedAmount::from_sat(-1_500),
            num_confirmations: confirmations,
            block_hash: None,
            block_height: None,
            timestamp: 1_700_000_000,
            total_fees: 500,
        }
    }

    #[tokio::test]
    async fn transaction_subscription_is_awaitable() {
        let (confirmed_tx, confirmed) = mpsc::channel(4);
        let (unconfirmed_tx, unconfirmed) = mpsc::channel(4);
        let mut subscription = TransactionSubscription {
            confirmed,
            unconfirmed,
        };

        unconfirmed_tx
            .send(transaction_detail(1, 0))
            .await
            .expect("receiver is alive");
        confirmed_tx
            .send(transaction_detail(1, 1))
            .await
            .expect("receiver is alive");
        drop(confirmed_tx);

        let pending = subscription.unconfirmed.recv().await.expect("one pending tx");
        assert_eq!(pending.num_confirmations, 0);
        assert_eq!(pending.value.to_sat(), -1_500);

        let mined = subscription.confirmed.recv().await.expect("one mined tx");
        assert_eq!(mined.hash, pending.hash);
        assert!(subscription.confirmed.recv().await.is_none());
    }

    #[test]
    fn wallet_address_checks_network() {
        let address = WalletAddress {
            address: "bcrt1qw508d6qejxtdg4y5r3zarvary0c5xw7kygt080".to_owned(),
            address_type: AddressType::WitnessPubKey,
        };
        assert!(address.to_address(bitcoin::Network::Regtest).is_ok());
        assert!(address.to_address(bitcoin::Network::Bitcoin).is_err());
    }
}
