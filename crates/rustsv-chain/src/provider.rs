//! Chain service traits and the ordered fallback chain.
//!
//! Redundant block-explorer backends all implement the same small traits;
//! `ServiceChain` tries them in order with a bounded number of attempts
//! each, logging failures and moving on, and fails only when every
//! service is exhausted.

use rustsv_transaction::Unspent;

use crate::ChainError;

/// Lists the unspent outputs of an address.
pub trait UtxoSource {
    /// Fetch all UTXOs currently spendable by `address`.
    ///
    /// # Arguments
    /// * `address` - The address to query.
    ///
    /// # Returns
    /// The unspent outputs, or an error if the service call fails.
    fn fetch_unspents(&self, address: &str) -> Result<Vec<Unspent>, ChainError>;
}

/// Submits raw transactions to the network.
pub trait Broadcaster {
    /// Broadcast a raw transaction.
    ///
    /// # Arguments
    /// * `raw_tx_hex` - The signed transaction hex.
    ///
    /// # Returns
    /// The transaction ID reported by the network.
    fn broadcast(&self, raw_tx_hex: &str) -> Result<String, ChainError>;
}

/// Fetches raw transactions by ID.
pub trait TxFetcher {
    /// Fetch the raw hex of a confirmed or mempool transaction.
    ///
    /// # Arguments
    /// * `txid` - The display-order transaction ID.
    ///
    /// # Returns
    /// The raw transaction hex.
    fn fetch_raw_transaction(&self, txid: &str) -> Result<String, ChainError>;
}

/// A complete block-explorer backend.
pub trait ChainService: UtxoSource + Broadcaster + TxFetcher {
    /// A short name for log messages.
    fn name(&self) -> &str;
}

/// An ordered list of redundant backends tried in sequence.
pub struct ServiceChain {
    services: Vec<Box<dyn ChainService>>,
    attempts: u32,
}

impl ServiceChain {
    /// Create an empty chain.
    ///
    /// # Arguments
    /// * `attempts` - Attempts per service before moving to the next.
    ///
    /// # Returns
    /// The empty chain.
    pub fn new(attempts: u32) -> Self {
        ServiceChain {
            services: Vec::new(),
            attempts: attempts.max(1),
        }
    }

    /// Append a backend to the end of the chain.
    ///
    /// # Arguments
    /// * `service` - The backend to add.
    pub fn push(&mut self, service: Box<dyn ChainService>) {
        self.services.push(service);
    }

    /// Number of configured backends.
    ///
    /// # Returns
    /// The backend count.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the chain has no backends.
    ///
    /// # Returns
    /// `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Run an operation against each service in order until one succeeds.
    fn try_each<T>(
        &self,
        what: &str,
        op: impl Fn(&dyn ChainService) -> Result<T, ChainError>,
    ) -> Result<T, ChainError> {
        for service in &self.services {
            for attempt in 1..=self.attempts {
                match op(service.as_ref()) {
                    Ok(value) => return Ok(value),
                    Err(e) => {
                        log::warn!(
                            "{} via {} failed (attempt {}/{}): {}",
                            what,
                            service.name(),
                            attempt,
                            self.attempts,
                            e
                        );
                    }
                }
            }
        }
        Err(ChainError::AllServicesFailed(what.to_string()))
    }
}

impl UtxoSource for ServiceChain {
    fn fetch_unspents(&self, address: &str) -> Result<Vec<Unspent>, ChainError> {
        self.try_each("fetch_unspents", |s| s.fetch_unspents(address))
    }
}

impl Broadcaster for ServiceChain {
    fn broadcast(&self, raw_tx_hex: &str) -> Result<String, ChainError> {
        self.try_each("broadcast", |s| s.broadcast(raw_tx_hex))
    }
}

impl TxFetcher for ServiceChain {
    fn fetch_raw_transaction(&self, txid: &str) -> Result<String, ChainError> {
        self.try_each("fetch_raw_transaction", |s| s.fetch_raw_transaction(txid))
    }
}
