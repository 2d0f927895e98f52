//! UTXO selection and end-to-end transaction construction.
//!
//! `sanitize_tx_data` normalizes the requested payments, selects inputs,
//! computes change, and orders the final output list; its result feeds
//! `build_p2pkh_transaction`, which assembles and signs the raw bytes.
//! Both steps are pure: no I/O happens until the caller broadcasts the
//! returned hex.

use rustsv_primitives::chainhash::Hash;
use rustsv_primitives::ec::PrivateKey;
use rustsv_primitives::hash::sha256d;
use rustsv_script::data::{
    build_data_script, build_raw_data_script, chunk_message, data_output_len, raw_data_output_len,
    MESSAGE_LIMIT,
};
use rustsv_script::{Address, Script};

use crate::convert::CurrencyConverter;
use crate::fee::estimate_fee;
use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::sighash::SighashComponents;
use crate::template::p2pkh;
use crate::transaction::Transaction;
use crate::unspent::{sort_by_amount, Unspent};
use crate::TransactionError;

// -----------------------------------------------------------------------
// Requested and prepared outputs
// -----------------------------------------------------------------------

/// A requested payment: destination address, decimal amount, and currency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payment {
    /// Destination address string.
    pub to: String,
    /// Decimal amount string in `currency` units.
    pub amount: String,
    /// Currency code (e.g. "satoshi", "bsv", "usd").
    pub currency: String,
}

impl Payment {
    /// Create a payment request.
    ///
    /// # Arguments
    /// * `to` - Destination address.
    /// * `amount` - Decimal amount string.
    /// * `currency` - Currency code.
    ///
    /// # Returns
    /// The payment request.
    pub fn new(to: impl Into<String>, amount: impl Into<String>, currency: impl Into<String>) -> Self {
        Payment {
            to: to.into(),
            amount: amount.into(),
            currency: currency.into(),
        }
    }

    /// Create a payment request denominated directly in satoshis.
    ///
    /// # Arguments
    /// * `to` - Destination address.
    /// * `satoshis` - Amount in satoshis.
    ///
    /// # Returns
    /// The payment request.
    pub fn from_satoshis(to: impl Into<String>, satoshis: u64) -> Self {
        Payment {
            to: to.into(),
            amount: satoshis.to_string(),
            currency: "satoshi".to_string(),
        }
    }
}

/// A normalized output ready for assembly.
///
/// Paying outputs carry a parsed address and satoshi amount; data-carrier
/// outputs carry the raw payload and always serialize with a zero amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreparedOutput {
    /// A value-bearing P2PKH output.
    Payment {
        /// The validated destination address.
        address: Address,
        /// The amount in satoshis.
        satoshis: u64,
    },
    /// A zero-value OP_RETURN data-carrier output.
    Data {
        /// The embedded payload bytes.
        payload: Vec<u8>,
    },
    /// A zero-value OP_RETURN output carrying pre-encoded pushdata
    /// elements (each already prefixed with its own push opcode).
    RawData {
        /// The pre-encoded pushdata stream.
        pushdata: Vec<u8>,
    },
}

impl PreparedOutput {
    /// Satoshi value of this output (0 for data carriers).
    ///
    /// # Returns
    /// The amount in satoshis.
    pub fn satoshis(&self) -> u64 {
        match self {
            PreparedOutput::Payment { satoshis, .. } => *satoshis,
            PreparedOutput::Data { .. } | PreparedOutput::RawData { .. } => 0,
        }
    }

    /// Build the locking script for this output.
    ///
    /// # Returns
    /// A P2PKH locking script or an OP_RETURN carrier script.
    pub fn locking_script(&self) -> Script {
        match self {
            PreparedOutput::Payment { address, .. } => p2pkh::lock(address),
            PreparedOutput::Data { payload } => build_data_script(payload),
            PreparedOutput::RawData { pushdata } => build_raw_data_script(pushdata),
        }
    }
}

// -----------------------------------------------------------------------
// Selection options
// -----------------------------------------------------------------------

/// Options controlling UTXO selection and data embedding.
#[derive(Clone, Debug)]
pub struct TxOptions {
    /// Use every available UTXO as an input (consolidation) instead of a
    /// minimal smallest-first subset.
    pub combine: bool,
    /// Optional message to embed in OP_RETURN outputs.
    pub message: Option<Vec<u8>>,
    /// Treat the message as a pre-encoded pushdata stream: it goes into a
    /// single OP_RETURN output verbatim, without chunking or an added
    /// push prefix.
    pub raw_pushdata: bool,
    /// Whether the signing key's public key is compressed (affects the fee
    /// estimate's per-input size).
    pub compressed: bool,
    /// Maximum bytes per data chunk; each chunk becomes its own output.
    pub message_limit: usize,
}

impl Default for TxOptions {
    fn default() -> Self {
        TxOptions {
            combine: true,
            message: None,
            raw_pushdata: false,
            compressed: true,
            message_limit: MESSAGE_LIMIT,
        }
    }
}

// -----------------------------------------------------------------------
// Sanitizer
// -----------------------------------------------------------------------

/// Normalize payments, select inputs, and compute change.
///
/// Steps:
/// 1. Parse every payment address and convert its amount to satoshis.
/// 2. Fail with `EmptyUnspents` if no UTXOs were supplied.
/// 3. Chunk any message into zero-value data outputs, tracking their exact
///    serialized size for the fee estimate.
/// 4. `combine` mode uses every UTXO; otherwise UTXOs are consumed
///    smallest-first (stable sort) until they cover the outputs plus the
///    fee estimated against the inputs consumed so far.
/// 5. A positive remainder becomes a change output to `leftover`; a zero
///    remainder adds no change output; a negative remainder fails with
///    `InsufficientFunds`.
/// 6. Data outputs are appended after every paying output.
///
/// # Arguments
/// * `unspents` - The available UTXOs.
/// * `payments` - The requested payments.
/// * `sat_per_byte` - Fee rate in satoshis per byte.
/// * `leftover` - Change address.
/// * `converter` - Currency conversion capability.
/// * `opts` - Selection options.
///
/// # Returns
/// The selected UTXOs and the final ordered output list.
pub fn sanitize_tx_data(
    unspents: &[Unspent],
    payments: &[Payment],
    sat_per_byte: u64,
    leftover: &str,
    converter: &dyn CurrencyConverter,
    opts: &TxOptions,
) -> Result<(Vec<Unspent>, Vec<PreparedOutput>), TransactionError> {
    let mut outputs: Vec<(Address, u64)> = Vec::with_capacity(payments.len());
    for payment in payments {
        let address = Address::from_string(&payment.to)?;
        let satoshis = converter.to_satoshis(&payment.amount, &payment.currency)?;
        outputs.push((address, satoshis));
    }

    if unspents.is_empty() {
        return Err(TransactionError::EmptyUnspents);
    }

    // Data outputs are buffered separately so every paying output
    // precedes every data output in the final list.
    let mut messages: Vec<PreparedOutput> = Vec::new();
    let mut op_return_total = 0usize;
    if let Some(message) = &opts.message {
        if opts.raw_pushdata {
            op_return_total += raw_data_output_len(message.len());
            messages.push(PreparedOutput::RawData {
                pushdata: message.clone(),
            });
        } else {
            for chunk in chunk_message(message, opts.message_limit) {
                op_return_total += data_output_len(chunk.len());
                messages.push(PreparedOutput::Data { payload: chunk });
            }
        }
    }

    // The fee estimate always reserves room for a change output.
    let num_outputs = outputs.len() + 1;
    let sum_outputs: u64 = outputs.iter().map(|(_, satoshis)| *satoshis).sum();

    let selected: Vec<Unspent>;
    let total_in: u64;
    let total_out: u64;

    if opts.combine {
        let fee = estimate_fee(
            unspents.len(),
            num_outputs,
            sat_per_byte,
            opts.compressed,
            op_return_total,
        );
        selected = unspents.to_vec();
        total_in = selected.iter().map(|u| u.amount).sum();
        total_out = sum_outputs + fee;
    } else {
        let mut sorted = unspents.to_vec();
        sort_by_amount(&mut sorted);

        let mut accumulated = 0u64;
        let mut required = 0u64;
        let mut index = 0usize;

        for (i, unspent) in sorted.iter().enumerate() {
            index = i;
            accumulated += unspent.amount;
            let fee = estimate_fee(
                i + 1,
                num_outputs,
                sat_per_byte,
                opts.compressed,
                op_return_total,
            );
            required = sum_outputs + fee;

            if accumulated >= required {
                break;
            }
        }

        sorted.truncate(index + 1);
        selected = sorted;
        total_in = accumulated;
        total_out = required;
    }

    let mut final_outputs: Vec<PreparedOutput> = outputs
        .into_iter()
        .map(|(address, satoshis)| PreparedOutput::Payment { address, satoshis })
        .collect();

    if total_in < total_out {
        return Err(TransactionError::InsufficientFunds {
            balance: total_in,
            required: total_out,
        });
    }

    let remaining = total_in - total_out;
    if remaining > 0 {
        let change = Address::from_string(leftover)?;
        final_outputs.push(PreparedOutput::Payment {
            address: change,
            satoshis: remaining,
        });
    }
    // remaining == 0: the inputs cover the outputs and fee exactly, so no
    // change output is appended.

    final_outputs.extend(messages);

    Ok((selected, final_outputs))
}

// -----------------------------------------------------------------------
// Assembler and signer
// -----------------------------------------------------------------------

/// Assemble and sign a P2PKH transaction.
///
/// Single-key wallet model: every input is assumed spendable by
/// `private_key`, so the key's own P2PKH locking script is the scriptCode
/// hashed for every input. The shared sighash components are computed once
/// after the input/output sets are final, then each input is signed and
/// its unlocking script installed. The whole operation is atomic: any
/// malformed UTXO script or signing failure aborts without partial output.
///
/// # Arguments
/// * `private_key` - The wallet key that owns every input.
/// * `unspents` - The selected UTXOs, in final input order.
/// * `outputs` - The final ordered output list.
///
/// # Returns
/// The signed transaction as a lowercase hex string.
pub fn build_p2pkh_transaction(
    private_key: &PrivateKey,
    unspents: &[Unspent],
    outputs: &[PreparedOutput],
) -> Result<String, TransactionError> {
    let mut tx = Transaction::new();

    for unspent in unspents {
        let locking_script = Script::from_hex(&unspent.script).map_err(|_| {
            TransactionError::MalformedUnspent(format!(
                "undecodable locking script for {}:{}",
                unspent.txid, unspent.tx_index
            ))
        })?;
        let hash = Hash::from_hex(&unspent.txid).map_err(|_| {
            TransactionError::MalformedUnspent(format!("undecodable txid {}", unspent.txid))
        })?;

        let mut input = TransactionInput::new();
        input.source_txid = *hash.as_bytes();
        input.source_tx_out_index = unspent.tx_index;
        input.set_source_output(Some(TransactionOutput {
            satoshis: unspent.amount,
            locking_script,
            change: false,
        }));
        tx.add_input(input);
    }

    for output in outputs {
        tx.add_output(TransactionOutput {
            satoshis: output.satoshis(),
            locking_script: output.locking_script(),
            change: false,
        });
    }

    // Shared hash components, computed once for all inputs.
    let components = SighashComponents::new(&tx);
    let script_code = p2pkh::script_code(private_key);

    for index in 0..tx.inputs.len() {
        let unlocking_script =
            p2pkh::sign_input(&tx, index, &components, &script_code, private_key)?;
        tx.inputs[index].unlocking_script = Some(unlocking_script);
    }

    Ok(tx.to_hex())
}

/// Compute the canonical transaction ID of a raw transaction hex string.
///
/// Double SHA-256 of the raw bytes, byte-reversed, hex-encoded. Matches
/// the txid any chain explorer reports for the same bytes.
///
/// # Arguments
/// * `tx_hex` - The raw transaction hex.
///
/// # Returns
/// The 64-character display-order txid.
pub fn calc_txid(tx_hex: &str) -> Result<String, TransactionError> {
    let bytes = hex::decode(tx_hex)
        .map_err(|e| TransactionError::SerializationError(format!("invalid hex: {}", e)))?;
    let mut id = sha256d(&bytes);
    id.reverse();
    Ok(hex::encode(id))
}
