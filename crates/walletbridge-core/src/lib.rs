pub mod classify;
pub mod config;
pub mod error;
pub mod rpc;
#[cfg(test)]
mod test_util;
pub mod types;
pub mod wallet;

pub use config::{Network, RpcConfig};
pub use error::{CoreError, TransportError};
pub use types::{AddressType, Utxo, WalletAddress};
pub use wallet::{BtcWalletBridge, WalletController};
