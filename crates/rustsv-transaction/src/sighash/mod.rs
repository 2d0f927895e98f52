//! Signature hash computation for transaction signing.
//!
//! Computes the digest that is signed by ECDSA to authorize spending a
//! transaction input. BSV uses the BIP-143 preimage structure with the
//! FORKID flag for replay protection; the digest handed to the signer is
//! the double SHA-256 of that preimage.
//!
//! The three shared components (hashPrevouts, hashSequence, hashOutputs)
//! are computed once per transaction via [`SighashComponents`] and reused
//! for every input's preimage.

use rustsv_primitives::hash::sha256d;
use rustsv_primitives::util::{TxWriter, VarInt};

use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Sighash flag constants
// -----------------------------------------------------------------------

/// Sign all inputs and all outputs (the default).
pub const SIGHASH_ALL: u32 = 0x01;

/// Replay-protection flag required on all BSV transactions after the UAHF fork.
pub const SIGHASH_FORKID: u32 = 0x40;

/// The standard BSV sighash type: ALL | FORKID.
pub const SIGHASH_ALL_FORKID: u32 = SIGHASH_ALL | SIGHASH_FORKID;

/// Mask applied to extract the base sighash type.
pub const SIGHASH_MASK: u32 = 0x1f;

// -----------------------------------------------------------------------
// Shared preimage components
// -----------------------------------------------------------------------

/// The per-transaction hash components of the BIP-143 preimage.
///
/// Each is a double SHA-256 over concatenated raw fields. They depend only
/// on the finalized input/output sets, so they are computed once and
/// reused for every input's sighash.
#[derive(Clone, Debug)]
pub struct SighashComponents {
    /// sha256d over every input's outpoint (txid + vout).
    pub hash_prevouts: [u8; 32],
    /// sha256d over every input's 4-byte sequence number.
    pub hash_sequence: [u8; 32],
    /// sha256d over every serialized output.
    pub hash_outputs: [u8; 32],
}

impl SighashComponents {
    /// Compute the shared hash components for a transaction.
    ///
    /// Call this after the input and output sets are final; the components
    /// are stale if either set changes afterwards.
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    ///
    /// # Returns
    /// The three shared component hashes.
    pub fn new(tx: &Transaction) -> Self {
        let mut prevouts = TxWriter::with_capacity(tx.inputs.len() * 36);
        for input in &tx.inputs {
            prevouts.write_bytes(&input.source_txid);
            prevouts.write_u32_le(input.source_tx_out_index);
        }

        let mut sequences = TxWriter::with_capacity(tx.inputs.len() * 4);
        for input in &tx.inputs {
            sequences.write_u32_le(input.sequence_number);
        }

        let mut outputs = TxWriter::new();
        for output in &tx.outputs {
            outputs.write_bytes(&output.to_bytes());
        }

        SighashComponents {
            hash_prevouts: sha256d(prevouts.as_bytes()),
            hash_sequence: sha256d(sequences.as_bytes()),
            hash_outputs: sha256d(outputs.as_bytes()),
        }
    }

    /// Build the BIP-143 preimage for one input.
    ///
    /// The preimage layout:
    /// 1. nVersion (4 bytes LE)
    /// 2. hashPrevouts (32 bytes)
    /// 3. hashSequence (32 bytes)
    /// 4. outpoint (32 + 4 bytes) - txid + vout of the input being signed
    /// 5. scriptCode (varint + script) - the locking script being satisfied
    /// 6. value (8 bytes LE) - satoshis of the output being spent
    /// 7. nSequence (4 bytes LE)
    /// 8. hashOutputs (32 bytes)
    /// 9. nLocktime (4 bytes LE)
    /// 10. sighashType (4 bytes LE)
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    /// * `input_index` - Index of the input being signed.
    /// * `script_code` - The locking script being satisfied.
    /// * `satoshis` - The satoshi value of the output being spent.
    /// * `sighash_type` - The combined sighash flags.
    ///
    /// # Returns
    /// The raw preimage bytes (not yet hashed).
    pub fn preimage(
        &self,
        tx: &Transaction,
        input_index: usize,
        script_code: &[u8],
        satoshis: u64,
        sighash_type: u32,
    ) -> Result<Vec<u8>, TransactionError> {
        if input_index >= tx.inputs.len() {
            return Err(TransactionError::InvalidTransaction(format!(
                "input index {} out of range (tx has {} inputs)",
                input_index,
                tx.inputs.len()
            )));
        }
        if sighash_type & SIGHASH_MASK != SIGHASH_ALL {
            return Err(TransactionError::SigningError(format!(
                "unsupported sighash base type {:#04x} (only SIGHASH_ALL)",
                sighash_type & SIGHASH_MASK
            )));
        }

        let input = &tx.inputs[input_index];

        let mut writer = TxWriter::with_capacity(182 + script_code.len());

        writer.write_u32_le(tx.version);
        writer.write_bytes(&self.hash_prevouts);
        writer.write_bytes(&self.hash_sequence);

        // Outpoint (txid + vout)
        writer.write_bytes(&input.source_txid);
        writer.write_u32_le(input.source_tx_out_index);

        // scriptCode with its own varint length prefix
        writer.write_varint(VarInt::from(script_code.len()));
        writer.write_bytes(script_code);

        // Value of the output being spent
        writer.write_u64_le(satoshis);

        writer.write_u32_le(input.sequence_number);
        writer.write_bytes(&self.hash_outputs);
        writer.write_u32_le(tx.lock_time);
        writer.write_u32_le(sighash_type);

        Ok(writer.into_bytes())
    }

    /// Compute the sighash digest for one input.
    ///
    /// Double SHA-256 of the preimage; this is the digest handed to the
    /// (raw, non-hashing) ECDSA signer.
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    /// * `input_index` - Index of the input being signed.
    /// * `script_code` - The locking script being satisfied.
    /// * `satoshis` - The satoshi value of the output being spent.
    /// * `sighash_type` - The combined sighash flags.
    ///
    /// # Returns
    /// A 32-byte digest.
    pub fn sighash(
        &self,
        tx: &Transaction,
        input_index: usize,
        script_code: &[u8],
        satoshis: u64,
        sighash_type: u32,
    ) -> Result<[u8; 32], TransactionError> {
        let preimage = self.preimage(tx, input_index, script_code, satoshis, sighash_type)?;
        Ok(sha256d(&preimage))
    }
}

// -----------------------------------------------------------------------
// One-off helpers
// -----------------------------------------------------------------------

/// Compute the BIP-143 FORKID signature hash for a single input.
///
/// Builds the shared components internally; when signing several inputs of
/// the same transaction, construct [`SighashComponents`] once instead.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - Index of the input being signed.
/// * `prev_output_script` - The locking script (scriptCode) of the output being spent.
/// * `sighash_type` - The combined sighash flags (e.g. `SIGHASH_ALL_FORKID`).
/// * `satoshis` - The satoshi value of the output being spent.
///
/// # Returns
/// A 32-byte double-SHA256 digest to be signed by ECDSA.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    sighash_type: u32,
    satoshis: u64,
) -> Result<[u8; 32], TransactionError> {
    let components = SighashComponents::new(tx);
    components.sighash(tx, input_index, prev_output_script, satoshis, sighash_type)
}

/// Build the BIP-143 preimage bytes for a single input without hashing.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - Index of the input being signed.
/// * `prev_output_script` - The locking script of the output being spent.
/// * `sighash_type` - The combined sighash flags.
/// * `satoshis` - The satoshi value of the output being spent.
///
/// # Returns
/// The raw preimage bytes.
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    sighash_type: u32,
    satoshis: u64,
) -> Result<Vec<u8>, TransactionError> {
    let components = SighashComponents::new(tx);
    components.preimage(tx, input_index, prev_output_script, satoshis, sighash_type)
}
