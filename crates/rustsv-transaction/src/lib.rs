/// rustsv - Transaction building, signing, and serialization.
///
/// Provides the Transaction type with inputs and outputs, fee estimation,
/// UTXO selection, BIP-143 FORKID signature hash computation, P2PKH
/// signing, and binary/hex serialization.

pub mod build;
pub mod convert;
pub mod fee;
pub mod input;
pub mod output;
pub mod sighash;
pub mod template;
pub mod transaction;
pub mod unspent;

mod error;
pub use build::{build_p2pkh_transaction, calc_txid, sanitize_tx_data, Payment, PreparedOutput, TxOptions};
pub use convert::CurrencyConverter;
pub use error::TransactionError;
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use transaction::Transaction;
pub use unspent::Unspent;

#[cfg(test)]
mod tests;
