//! WhatsOnChain block-explorer client.
//!
//! An async reqwest client for the WhatsOnChain REST API that also
//! implements the synchronous capability traits by blocking on its own
//! futures, so it can sit in a `ServiceChain` behind object-safe traits.

use std::future::Future;

use serde::Deserialize;

use rustsv_script::{Address, Network};
use rustsv_transaction::template::p2pkh;
use rustsv_transaction::Unspent;

use crate::config::ChainConfig;
use crate::currency::Currency;
use crate::provider::{Broadcaster, ChainService, TxFetcher, UtxoSource};
use crate::rates::RateSource;
use crate::ChainError;

/// One UTXO as reported by the WhatsOnChain unspent endpoint.
#[derive(Debug, Deserialize)]
struct WocUtxo {
    /// Block height, or 0 for mempool transactions.
    height: i64,
    /// Output index within the transaction.
    tx_pos: u32,
    /// Transaction ID in display order.
    tx_hash: String,
    /// Value in satoshis.
    value: u64,
}

/// The chain info endpoint's response (fields we use).
#[derive(Debug, Deserialize)]
struct WocChainInfo {
    /// Current best block height.
    blocks: i64,
}

/// The exchange rate endpoint's response.
#[derive(Debug, Deserialize)]
struct WocExchangeRate {
    /// Fiat currency code (always "USD").
    currency: String,
    /// Units of that currency per coin.
    rate: f64,
}

/// HTTP client for the WhatsOnChain API.
#[derive(Debug, Clone)]
pub struct WocClient {
    base_url: String,
    http: reqwest::Client,
}

impl WocClient {
    /// Create a client for the given network.
    ///
    /// # Arguments
    /// * `network` - Mainnet or Testnet.
    /// * `config` - Timeout and retry configuration.
    ///
    /// # Returns
    /// The client, or an error if the HTTP client cannot be built.
    pub fn new(network: Network, config: &ChainConfig) -> Result<Self, ChainError> {
        let chain = match network {
            Network::Mainnet => "main",
            Network::Testnet => "test",
        };
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(WocClient {
            base_url: format!("https://api.whatsonchain.com/v1/bsv/{}", chain),
            http,
        })
    }

    /// Fetch the unspent outputs of an address.
    ///
    /// The unspent endpoint does not return locking scripts; each UTXO
    /// gets the P2PKH locking script of the queried address, which is what
    /// a single-key wallet spends.
    ///
    /// # Arguments
    /// * `address` - The address to query.
    ///
    /// # Returns
    /// The unspent outputs with confirmation counts relative to the
    /// current tip.
    pub async fn unspents_async(&self, address: &str) -> Result<Vec<Unspent>, ChainError> {
        let parsed = Address::from_string(address)?;
        let script_hex = p2pkh::lock(&parsed).to_hex();

        let tip = self.chain_info_async().await?.blocks;

        let url = format!("{}/address/{}/unspent", self.base_url, address);
        let utxos: Vec<WocUtxo> = self.http.get(&url).send().await?.json().await?;

        Ok(utxos
            .into_iter()
            .map(|u| {
                let confirmations = if u.height > 0 {
                    (tip - u.height + 1).max(0) as u32
                } else {
                    0
                };
                Unspent::new(u.value, confirmations, script_hex.clone(), u.tx_hash, u.tx_pos)
            })
            .collect())
    }

    /// Fetch the current chain info.
    async fn chain_info_async(&self) -> Result<WocChainInfo, ChainError> {
        let url = format!("{}/chain/info", self.base_url);
        Ok(self.http.get(&url).send().await?.json().await?)
    }

    /// Broadcast a raw transaction.
    ///
    /// # Arguments
    /// * `raw_tx_hex` - The signed transaction hex.
    ///
    /// # Returns
    /// The transaction ID reported by the network, or
    /// `BroadcastRejected` with the service's error body.
    pub async fn broadcast_async(&self, raw_tx_hex: &str) -> Result<String, ChainError> {
        let url = format!("{}/tx/raw", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "txhex": raw_tx_hex }))
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ChainError::BroadcastRejected(detail));
        }

        // The endpoint answers with the txid as a JSON string.
        let txid: String = response.json().await?;
        Ok(txid)
    }

    /// Fetch the raw hex of a transaction.
    ///
    /// # Arguments
    /// * `txid` - The display-order transaction ID.
    ///
    /// # Returns
    /// The raw transaction hex.
    pub async fn raw_transaction_async(&self, txid: &str) -> Result<String, ChainError> {
        let url = format!("{}/tx/{}/hex", self.base_url, txid);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ChainError::UnexpectedResponse {
                service: "whatsonchain".to_string(),
                detail: format!("status {} for txid {}", response.status(), txid),
            });
        }
        Ok(response.text().await?.trim().to_string())
    }

    /// Fetch the current USD exchange rate.
    pub async fn exchange_rate_async(&self) -> Result<f64, ChainError> {
        let url = format!("{}/exchangerate", self.base_url);
        let rate: WocExchangeRate = self.http.get(&url).send().await?.json().await?;
        if rate.currency != "USD" {
            return Err(ChainError::UnexpectedResponse {
                service: "whatsonchain".to_string(),
                detail: format!("unexpected rate currency {}", rate.currency),
            });
        }
        Ok(rate.rate)
    }
}

/// Drive a future to completion from synchronous code.
///
/// Uses the ambient tokio runtime when one exists (blocking in place),
/// otherwise spins up a runtime for the call.
fn run_blocking<T>(
    fut: impl Future<Output = Result<T, ChainError>>,
) -> Result<T, ChainError> {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => tokio::task::block_in_place(|| handle.block_on(fut)),
        Err(_) => {
            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| ChainError::Runtime(e.to_string()))?;
            rt.block_on(fut)
        }
    }
}

impl UtxoSource for WocClient {
    fn fetch_unspents(&self, address: &str) -> Result<Vec<Unspent>, ChainError> {
        run_blocking(self.unspents_async(address))
    }
}

impl Broadcaster for WocClient {
    fn broadcast(&self, raw_tx_hex: &str) -> Result<String, ChainError> {
        run_blocking(self.broadcast_async(raw_tx_hex))
    }
}

impl TxFetcher for WocClient {
    fn fetch_raw_transaction(&self, txid: &str) -> Result<String, ChainError> {
        run_blocking(self.raw_transaction_async(txid))
    }
}

impl ChainService for WocClient {
    fn name(&self) -> &str {
        "whatsonchain"
    }
}

impl RateSource for WocClient {
    fn rate(&self, currency: Currency) -> Result<f64, ChainError> {
        // The public endpoint only quotes USD.
        if currency != Currency::Usd {
            return Err(ChainError::UnsupportedCurrency(currency.code().to_string()));
        }
        run_blocking(self.exchange_rate_async())
    }
}
