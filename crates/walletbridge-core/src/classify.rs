//! Locking-script classification.

use bitcoin::Script;

use crate::types::AddressType;

// ==============================================================================
// Script Classification
// ==============================================================================

/// Classify a locking script by the spending template the channel layer can
/// fund from. Pattern matching is left to the `bitcoin` crate.
///
/// Every P2SH script is reported as [`AddressType::NestedWitnessPubKey`]: the
/// daemon does not return redeem scripts, so a nested witness program cannot
/// be told apart from any other P2SH output.
#[must_use]
pub fn classify_pk_script(script: &Script) -> AddressType {
    if script.is_p2wpkh() {
        AddressType::WitnessPubKey
    } else if script.is_p2sh() {
        AddressType::NestedWitnessPubKey
    } else {
        AddressType::Unknown
    }
}
