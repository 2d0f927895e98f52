//! Pay-to-Public-Key-Hash (P2PKH) script template.
//!
//! Creates standard P2PKH locking scripts (`OP_DUP OP_HASH160 <hash>
//! OP_EQUALVERIFY OP_CHECKSIG`) and unlocking scripts (`<sig> <pubkey>`),
//! and signs individual inputs.

use rustsv_primitives::ec::PrivateKey;
use rustsv_primitives::hash::hash160;
use rustsv_script::opcodes::*;
use rustsv_script::{Address, Script};

use crate::sighash::{SighashComponents, SIGHASH_ALL_FORKID};
use crate::transaction::Transaction;
use crate::TransactionError;

/// Create a P2PKH locking script from an address.
///
/// Produces: `OP_DUP OP_HASH160 <20-byte pubkey hash> OP_EQUALVERIFY OP_CHECKSIG`
///
/// # Arguments
/// * `address` - The address whose public key hash to lock to.
///
/// # Returns
/// The 25-byte P2PKH locking script.
pub fn lock(address: &Address) -> Script {
    lock_to_hash(&address.public_key_hash)
}

/// Create a P2PKH locking script from a raw 20-byte public key hash.
///
/// # Arguments
/// * `pkh` - The hash160 of the public key.
///
/// # Returns
/// The 25-byte P2PKH locking script.
pub fn lock_to_hash(pkh: &[u8; 20]) -> Script {
    let mut bytes = Vec::with_capacity(25);
    bytes.push(OP_DUP);
    bytes.push(OP_HASH160);
    bytes.push(OP_DATA_20);
    bytes.extend_from_slice(pkh);
    bytes.push(OP_EQUALVERIFY);
    bytes.push(OP_CHECKSIG);

    Script::from_bytes(&bytes)
}

/// Create the locking script a key's own outputs use.
///
/// This is also the scriptCode hashed when signing the key's inputs.
///
/// # Arguments
/// * `private_key` - The wallet key.
///
/// # Returns
/// The key's P2PKH locking script.
pub fn script_code(private_key: &PrivateKey) -> Script {
    let pub_key_bytes = private_key
        .pub_key()
        .serialize(private_key.is_compressed());
    lock_to_hash(&hash160(&pub_key_bytes))
}

/// Build a P2PKH unlocking script from a signature and public key.
///
/// # Arguments
/// * `sig_with_flag` - DER signature with the 1-byte sighash flag appended.
/// * `pub_key` - SEC1 public key bytes.
///
/// # Returns
/// The unlocking script `push(sig+flag) push(pubkey)`.
pub fn unlock_script(sig_with_flag: &[u8], pub_key: &[u8]) -> Result<Script, TransactionError> {
    let mut script = Script::new();
    script.append_push_data(sig_with_flag)?;
    script.append_push_data(pub_key)?;
    Ok(script)
}

/// Sign one input and produce its unlocking script.
///
/// Computes the BIP-143 FORKID sighash for the input against the supplied
/// scriptCode, signs it with RFC6979 deterministic ECDSA, and constructs
/// `<DER_sig || 0x41> <pubkey>`.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - The index of the input to sign.
/// * `components` - Precomputed shared sighash components for `tx`.
/// * `script_code` - The locking script being satisfied.
/// * `private_key` - The key to sign with.
///
/// # Returns
/// The P2PKH unlocking script, or an error if the input has no source
/// output info or signing fails.
pub fn sign_input(
    tx: &Transaction,
    input_index: usize,
    components: &SighashComponents,
    script_code: &Script,
    private_key: &PrivateKey,
) -> Result<Script, TransactionError> {
    let input = tx.inputs.get(input_index).ok_or_else(|| {
        TransactionError::SigningError(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        ))
    })?;

    let satoshis = input.source_satoshis().ok_or_else(|| {
        TransactionError::SigningError(
            "missing source output on input (no previous tx info)".to_string(),
        )
    })?;

    let digest = components.sighash(
        tx,
        input_index,
        script_code.to_bytes(),
        satoshis,
        SIGHASH_ALL_FORKID,
    )?;

    let signature = private_key
        .sign(&digest)
        .map_err(|e| TransactionError::SigningError(e.to_string()))?;

    let der_sig = signature.to_der();
    let mut sig_buf = Vec::with_capacity(der_sig.len() + 1);
    sig_buf.extend_from_slice(&der_sig);
    sig_buf.push(SIGHASH_ALL_FORKID as u8);

    let pub_key_bytes = private_key
        .pub_key()
        .serialize(private_key.is_compressed());

    unlock_script(&sig_buf, &pub_key_bytes)
}
