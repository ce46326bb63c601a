use bitcoin::{Amount, OutPoint, ScriptBuf, Txid};

use crate::classify::classify_pk_script;
use crate::error::CoreError;
use crate::types::{UnspentOutput, Utxo};

/// Normalize one `listunspent` record.
///
/// Returns `Ok(None)` for outputs that are not witness-spendable; those are
/// not funding candidates and are dropped rather than reported. Any decode
/// failure on a witness output is an error.
pub(super) fn normalize_unspent(output: &UnspentOutput) -> Result<Option<Utxo>, CoreError> {
    let pk_script = script_from_hex(&output.script_pub_key)?;

    let address_type = classify_pk_script(&pk_script);
    if !address_type.is_witness() {
        return Ok(None);
    }

    let txid = parse_txid(&output.txid)?;
    let value = parse_btc_amount(&output.amount)?;

    Ok(Some(Utxo {
        address_type,
        value,
        pk_script,
        outpoint: OutPoint::new(txid, output.vout),
    }))
}

fn script_from_hex(hex_str: &str) -> Result<ScriptBuf, CoreError> {
    ScriptBuf::from_hex(hex_str)
        .map_err(|e| CoreError::ScriptDecode(format!("invalid scriptPubKey hex `{hex_str}`: {e}")))
}

fn parse_txid(value: &str) -> Result<Txid, CoreError> {
    value
        .parse()
        .map_err(|e| CoreError::HashParse(format!("invalid txid `{value}`: {e}")))
}

/// Parse a BTC amount from a JSON value.
///
/// Number values are parsed via `Amount::from_float_in` to support scientific
/// notation, while string values are parsed via `Amount::from_str_in`.
pub(super) fn parse_btc_amount(value: &serde_json::Value) -> Result<Amount, CoreError> {
    match value {
        serde_json::Value::Number(n) => {
            let parsed = n
                .as_f64()
                .ok_or_else(|| CoreError::AmountConversion(format!("invalid BTC amount `{value}`")))?;
            Amount::from_float_in(parsed, bitcoin::Denomination::Bitcoin).map_err(|e| {
                CoreError::AmountConversion(format!("invalid BTC amount `{value}`: {e}"))
            })
        }
        serde_json::Value::String(s) => Amount::from_str_in(s, bitcoin::Denomination::Bitcoin)
            .map_err(|e| CoreError::AmountConversion(format!("invalid BTC amount `{s}`: {e}"))),
        _ => Err(CoreError::AmountConversion(format!(
            "expected numeric BTC amount, got: {value}"
        ))),
    }
}
