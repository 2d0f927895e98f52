//! Single-key wallet.
//!
//! One private key, one address. The wallet keeps a snapshot of its
//! unspent outputs, creates signed transactions from them, and hands raw
//! hex to a broadcaster. Construction and signing are pure; only
//! `fetch_unspents` and `send` touch the network, through the capability
//! traits.

use rustsv_chain::fees::DEFAULT_FEE_RATE;
use rustsv_chain::{Broadcaster, UtxoSource};
use rustsv_primitives::ec::PrivateKey;
use rustsv_script::data::{encode_data_parts, MESSAGE_LIMIT};
use rustsv_script::{Address, Network, Script};
use rustsv_transaction::template::p2pkh;
use rustsv_transaction::{
    build_p2pkh_transaction, calc_txid, sanitize_tx_data, CurrencyConverter, Payment, TxOptions,
    Unspent,
};

use crate::WalletError;

/// Options for creating a transaction from a wallet.
#[derive(Clone, Debug)]
pub struct WalletTxOptions {
    /// Fee rate in satoshis per byte.
    pub fee: u64,
    /// Change address; defaults to the wallet's own address.
    pub leftover: Option<String>,
    /// Consolidate every available UTXO instead of a minimal subset.
    pub combine: bool,
    /// Optional message to embed in OP_RETURN outputs.
    pub message: Option<Vec<u8>>,
    /// Maximum bytes per data chunk.
    pub message_limit: usize,
    /// Explicit UTXOs to spend; defaults to the wallet's fetched snapshot.
    pub unspents: Option<Vec<Unspent>>,
}

impl Default for WalletTxOptions {
    fn default() -> Self {
        WalletTxOptions {
            fee: DEFAULT_FEE_RATE,
            leftover: None,
            combine: true,
            message: None,
            message_limit: MESSAGE_LIMIT,
            unspents: None,
        }
    }
}

/// A single-key wallet.
pub struct Wallet {
    key: PrivateKey,
    network: Network,
    address: Address,
    unspents: Vec<Unspent>,
}

impl Wallet {
    /// Create a wallet around an existing private key.
    ///
    /// # Arguments
    /// * `key` - The wallet key.
    /// * `network` - The network its address lives on.
    ///
    /// # Returns
    /// The wallet.
    pub fn new(key: PrivateKey, network: Network) -> Self {
        let address = Address::from_public_key_bytes(
            &key.pub_key().serialize(key.is_compressed()),
            network,
        );
        Wallet {
            key,
            network,
            address,
            unspents: Vec::new(),
        }
    }

    /// Create a wallet with a fresh random key.
    ///
    /// # Arguments
    /// * `network` - The network its address lives on.
    ///
    /// # Returns
    /// The wallet.
    pub fn generate(network: Network) -> Self {
        Self::new(PrivateKey::new(), network)
    }

    /// Create a wallet from a WIF-encoded private key.
    ///
    /// # Arguments
    /// * `wif` - The Base58Check WIF string.
    /// * `network` - The network its address lives on.
    ///
    /// # Returns
    /// The wallet, or an error for a malformed WIF.
    pub fn from_wif(wif: &str, network: Network) -> Result<Self, WalletError> {
        Ok(Self::new(PrivateKey::from_wif(wif)?, network))
    }

    /// The wallet's address.
    ///
    /// # Returns
    /// The address funds should be sent to.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The network this wallet's address lives on.
    ///
    /// # Returns
    /// The network.
    pub fn network(&self) -> Network {
        self.network
    }

    /// The wallet key's own P2PKH locking script.
    ///
    /// # Returns
    /// The script its outputs are locked with and its inputs sign against.
    pub fn script_code(&self) -> Script {
        p2pkh::script_code(&self.key)
    }

    /// The current UTXO snapshot.
    ///
    /// # Returns
    /// The unspent outputs fetched by the last `fetch_unspents` call.
    pub fn unspents(&self) -> &[Unspent] {
        &self.unspents
    }

    /// Sum of the current UTXO snapshot, in satoshis.
    ///
    /// # Returns
    /// The spendable balance as of the last fetch.
    pub fn balance(&self) -> u64 {
        self.unspents.iter().map(|u| u.amount).sum()
    }

    /// Refresh the UTXO snapshot from a chain service.
    ///
    /// # Arguments
    /// * `source` - The UTXO listing capability.
    ///
    /// # Returns
    /// The refreshed snapshot.
    pub fn fetch_unspents(&mut self, source: &dyn UtxoSource) -> Result<&[Unspent], WalletError> {
        self.unspents = source.fetch_unspents(&self.address.address_string)?;
        log::debug!(
            "fetched {} unspents for {} ({} satoshis)",
            self.unspents.len(),
            self.address,
            self.balance()
        );
        Ok(&self.unspents)
    }

    /// Create a signed P2PKH transaction.
    ///
    /// Pure given the UTXOs in `opts` or the current snapshot; nothing is
    /// broadcast.
    ///
    /// # Arguments
    /// * `payments` - The requested payments.
    /// * `converter` - Currency conversion capability.
    /// * `opts` - Fee rate, change address, selection options.
    ///
    /// # Returns
    /// The signed transaction hex.
    pub fn create_transaction(
        &self,
        payments: &[Payment],
        converter: &dyn CurrencyConverter,
        opts: &WalletTxOptions,
    ) -> Result<String, WalletError> {
        self.create_transaction_inner(payments, converter, opts, false)
    }

    /// Create a signed transaction embedding pre-encoded pushdata.
    ///
    /// Each part gets its own push prefix and all parts share a single
    /// zero-value OP_RETURN output, so protocols that layer multiple
    /// pushes in one output (prefix + body) serialize correctly.
    ///
    /// # Arguments
    /// * `pushdata_parts` - The data elements for the output.
    /// * `converter` - Currency conversion capability.
    /// * `opts` - Fee rate, change address, selection options; any
    ///   `message` in the options is replaced by the encoded parts.
    ///
    /// # Returns
    /// The signed transaction hex.
    pub fn create_data_transaction(
        &self,
        pushdata_parts: &[&[u8]],
        converter: &dyn CurrencyConverter,
        opts: &WalletTxOptions,
    ) -> Result<String, WalletError> {
        let pushdata = encode_data_parts(pushdata_parts)?;
        let mut opts = opts.clone();
        opts.message = Some(pushdata);
        self.create_transaction_inner(&[], converter, &opts, true)
    }

    /// Create, then broadcast, returning the network's transaction ID.
    ///
    /// Fetches a fresh UTXO snapshot first unless `opts` carries explicit
    /// unspents.
    ///
    /// # Arguments
    /// * `payments` - The requested payments.
    /// * `converter` - Currency conversion capability.
    /// * `source` - The UTXO listing capability.
    /// * `broadcaster` - The broadcast capability.
    /// * `opts` - Fee rate, change address, selection options.
    ///
    /// # Returns
    /// The broadcast transaction ID.
    pub fn send(
        &mut self,
        payments: &[Payment],
        converter: &dyn CurrencyConverter,
        source: &dyn UtxoSource,
        broadcaster: &dyn Broadcaster,
        opts: &WalletTxOptions,
    ) -> Result<String, WalletError> {
        if opts.unspents.is_none() {
            self.fetch_unspents(source)?;
        }
        let tx_hex = self.create_transaction(payments, converter, opts)?;
        let txid = broadcaster.broadcast(&tx_hex)?;
        log::debug!("broadcast {} ({} bytes)", txid, tx_hex.len() / 2);
        Ok(txid)
    }

    /// The transaction ID a raw transaction hex would have on-chain.
    ///
    /// # Arguments
    /// * `tx_hex` - The raw transaction hex.
    ///
    /// # Returns
    /// The display-order txid.
    pub fn txid(tx_hex: &str) -> Result<String, WalletError> {
        Ok(calc_txid(tx_hex)?)
    }

    fn create_transaction_inner(
        &self,
        payments: &[Payment],
        converter: &dyn CurrencyConverter,
        opts: &WalletTxOptions,
        raw_pushdata: bool,
    ) -> Result<String, WalletError> {
        let unspents = opts.unspents.as_deref().unwrap_or(&self.unspents);
        let leftover = opts
            .leftover
            .clone()
            .unwrap_or_else(|| self.address.address_string.clone());

        let tx_opts = TxOptions {
            combine: opts.combine,
            message: opts.message.clone(),
            raw_pushdata,
            compressed: self.key.is_compressed(),
            message_limit: opts.message_limit,
        };

        let (selected, outputs) = sanitize_tx_data(
            unspents,
            payments,
            opts.fee,
            &leftover,
            converter,
            &tx_opts,
        )?;

        Ok(build_p2pkh_transaction(&self.key, &selected, &outputs)?)
    }
}
