//! Exchange rates with an explicit TTL cache.
//!
//! A `RateSource` produces the current price of one coin in a fiat
//! currency; `CachedRates` wraps a source with a per-currency cache entry
//! (rate + fetch time) that refreshes when older than the configured TTL.
//! `CachedRates` is also the live `CurrencyConverter` implementation the
//! transaction sanitizer consumes.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rustsv_transaction::{CurrencyConverter, TransactionError};

use crate::currency::{native_to_satoshis, parse_decimal_scaled, Currency};
use crate::ChainError;

/// Produces the current price of one coin in a fiat currency.
pub trait RateSource {
    /// Fetch the rate: how many units of `currency` one coin is worth.
    ///
    /// # Arguments
    /// * `currency` - A fiat currency.
    ///
    /// # Returns
    /// The rate, or an error if the currency is unsupported or the fetch
    /// fails.
    fn rate(&self, currency: Currency) -> Result<f64, ChainError>;
}

/// A cached rate: the value and when it was fetched.
#[derive(Clone, Copy, Debug)]
struct RateEntry {
    rate: f64,
    fetched_at: Instant,
}

/// A `RateSource` wrapper with an explicit per-currency TTL cache.
///
/// An entry is served while younger than the TTL and refreshed from the
/// source once stale. A failed refresh surfaces the error rather than
/// silently serving stale data.
pub struct CachedRates<S: RateSource> {
    source: S,
    ttl: Duration,
    entries: Mutex<HashMap<Currency, RateEntry>>,
}

impl<S: RateSource> CachedRates<S> {
    /// Wrap a rate source with a cache.
    ///
    /// # Arguments
    /// * `source` - The underlying rate source.
    /// * `ttl` - How long a fetched rate stays fresh.
    ///
    /// # Returns
    /// The caching wrapper.
    pub fn new(source: S, ttl: Duration) -> Self {
        CachedRates {
            source,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The current rate for a fiat currency, from cache or refreshed.
    ///
    /// # Arguments
    /// * `currency` - The fiat currency.
    ///
    /// # Returns
    /// Units of `currency` per coin.
    pub fn rate(&self, currency: Currency) -> Result<f64, ChainError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ChainError::Runtime("rate cache lock poisoned".to_string()))?;

        if let Some(entry) = entries.get(&currency) {
            if entry.fetched_at.elapsed() < self.ttl {
                return Ok(entry.rate);
            }
        }

        let rate = self.source.rate(currency)?;
        entries.insert(
            currency,
            RateEntry {
                rate,
                fetched_at: Instant::now(),
            },
        );
        Ok(rate)
    }

    /// Convert a decimal fiat amount to satoshis at the current rate.
    ///
    /// The amount scales exactly to 10^-8 precision first; only the final
    /// division by the rate is floating point, truncated toward zero.
    ///
    /// # Arguments
    /// * `amount` - The decimal amount string.
    /// * `currency` - The fiat currency.
    ///
    /// # Returns
    /// The satoshi value.
    fn fiat_to_satoshis(&self, amount: &str, currency: Currency) -> Result<u64, ChainError> {
        let scaled = parse_decimal_scaled(amount, 8)?;
        let rate = self.rate(currency)?;
        if !(rate > 0.0) {
            return Err(ChainError::UnexpectedResponse {
                service: "rates".to_string(),
                detail: format!("non-positive rate {} for {}", rate, currency.code()),
            });
        }
        // scaled is amount x 1e8; dividing by (currency per coin) yields
        // satoshis directly.
        Ok((scaled as f64 / rate).floor() as u64)
    }
}

impl<S: RateSource> CurrencyConverter for CachedRates<S> {
    fn to_satoshis(&self, amount: &str, currency: &str) -> Result<u64, TransactionError> {
        let currency = Currency::from_code(currency)
            .map_err(|e| TransactionError::ConversionError(e.to_string()))?;

        let result = if currency.is_native() {
            native_to_satoshis(amount, currency)
        } else {
            self.fiat_to_satoshis(amount, currency)
        };

        result.map_err(|e| TransactionError::ConversionError(e.to_string()))
    }
}
