/// rustsv - Single-key wallet orchestration.
///
/// Ties the pure transaction engine to the chain capability traits: a
/// `Wallet` owns one private key, derives its address and locking script,
/// fetches its UTXOs through a `UtxoSource`, and creates, signs, and
/// broadcasts payment and OP_RETURN data transactions.

mod error;
mod wallet;

pub use error::WalletError;
pub use wallet::{Wallet, WalletTxOptions};
