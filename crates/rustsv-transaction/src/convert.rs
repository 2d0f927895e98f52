//! Currency conversion capability.
//!
//! Payment amounts arrive as decimal strings in an arbitrary supported
//! currency; the sanitizer normalizes them to satoshis through this trait.
//! The live implementation (exchange rates with a TTL cache) lives in the
//! chain crate; tests use fixed-rate fixtures.

use crate::TransactionError;

/// Converts decimal amounts in a named currency into satoshis.
pub trait CurrencyConverter {
    /// Convert `amount` (a decimal string such as `"0.004"`) in `currency`
    /// (a lowercase code such as `"satoshi"`, `"bsv"`, or `"usd"`) into
    /// satoshis.
    ///
    /// # Arguments
    /// * `amount` - The decimal amount string.
    /// * `currency` - The currency code.
    ///
    /// # Returns
    /// The amount in satoshis, or a `ConversionError` for unknown
    /// currencies or unparseable amounts.
    fn to_satoshis(&self, amount: &str, currency: &str) -> Result<u64, TransactionError>;
}
