//! Client configuration.
//!
//! One explicit configuration object passed at construction time; there is
//! no process-wide mutable state.

use std::time::Duration;

/// Configuration for chain service clients and the rate cache.
#[derive(Clone, Debug)]
pub struct ChainConfig {
    /// Per-request HTTP timeout.
    pub timeout: Duration,

    /// Attempts per service before the fallback chain moves on.
    pub attempts: u32,

    /// How long a fetched exchange rate stays fresh.
    pub rate_cache_ttl: Duration,

    /// Default fee rate in satoshis per byte.
    pub default_fee_rate: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        ChainConfig {
            timeout: Duration::from_secs(30),
            attempts: 1,
            rate_cache_ttl: Duration::from_secs(60),
            default_fee_rate: crate::fees::DEFAULT_FEE_RATE,
        }
    }
}
