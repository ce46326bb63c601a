//! Shared test helpers for `walletbridge-core` unit tests.
//!
//! Builders for `listunspent` records and locking scripts, so tests across
//! modules describe wallet contents the same way.

use crate::types::UnspentOutput;

// ==============================================================================
// Script Helpers
// ==============================================================================

/// P2WPKH locking script hex: `OP_0 PUSH20 <hash>`, hash bytes all `fill`.
pub fn p2wpkh_script_hex(fill: u8) -> String {
    format!("0014{}", hex_repeat(fill, 20))
}

/// P2SH locking script hex: `OP_HASH160 PUSH20 <hash> OP_EQUAL`.
pub fn p2sh_script_hex(fill: u8) -> String {
    format!("a914{}87", hex_repeat(fill, 20))
}

/// P2PKH locking script hex: `OP_DUP OP_HASH160 PUSH20 <hash> OP_EQUALVERIFY OP_CHECKSIG`.
pub fn p2pkh_script_hex(fill: u8) -> String {
    format!("76a914{}88ac", hex_repeat(fill, 20))
}

fn hex_repeat(byte: u8, count: usize) -> String {
    format!("{byte:02x}").repeat(count)
}

// ==============================================================================
// Unspent Output Builders
// ==============================================================================

/// A 64-character txid made of one repeated byte.
pub fn txid_hex(b: u8) -> String {
    hex_repeat(b, 32)
}

/// A `listunspent` record with the fields btcwallet always sends.
pub fn unspent(
    txid: &str,
    vout: u32,
    amount: serde_json::Value,
    script_hex: &str,
    confirmations: i64,
) -> UnspentOutput {
    UnspentOutput {
        txid: txid.to_owned(),
        vout,
        amount,
        script_pub_key: script_hex.to_owned(),
        confirmations,
        address: None,
        account: Some("default".to_owned()),
        spendable: true,
    }
}

/// A P2WPKH record worth `btc`.
pub fn witness_unspent(txid_byte: u8, vout: u32, btc: f64, confirmations: i64) -> UnspentOutput {
    unspent(
        &txid_hex(txid_byte),
        vout,
        serde_json::json!(btc),
        &p2wpkh_script_hex(txid_byte),
        confirmations,
    )
}
