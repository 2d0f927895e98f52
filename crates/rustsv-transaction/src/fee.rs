//! Deterministic fee estimation.
//!
//! Models the serialized size of a pending transaction from its input and
//! output counts before any signature exists, then converts to satoshis at
//! a sat/byte rate. The model is a deliberate approximation: a signed
//! P2PKH input is 147-149 bytes depending on DER integer lengths, so the
//! estimate may overshoot the final transaction by a few bytes, but it
//! never undershoots enough to drop the true fee rate to zero.

use rustsv_primitives::util::VarInt;

/// Approximate size of a signed P2PKH input with a compressed public key:
/// outpoint(36) + script length(1) + signature push(73) + pubkey push(34) +
/// sequence(4).
pub const P2PKH_INPUT_SIZE_COMPRESSED: u64 = 148;

/// Approximate size of a signed P2PKH input with an uncompressed public key.
pub const P2PKH_INPUT_SIZE_UNCOMPRESSED: u64 = 180;

/// Size of a P2PKH output: amount(8) + script length(1) + script(25).
pub const P2PKH_OUTPUT_SIZE: u64 = 34;

/// Fixed transaction overhead: version(4) + lock time(4).
pub const TX_OVERHEAD: u64 = 8;

/// Estimate the fee for a transaction in satoshis.
///
/// The size model:
/// `overhead + n_inputs x input_size + varint(n_inputs) + n_outputs x 34 +
/// varint(n_outputs) + op_return_total`, multiplied by the sat/byte rate.
///
/// `n_outputs` counts P2PKH outputs only; data-carrier outputs enter
/// through `op_return_total`, the exact serialized size of every data
/// output including its 8-byte zero amount and script-length varint.
///
/// # Arguments
/// * `n_inputs` - Number of inputs.
/// * `n_outputs` - Number of P2PKH outputs (payments plus change).
/// * `sat_per_byte` - Fee rate. A rate of 0 yields a fee of 0.
/// * `compressed` - Whether the signing key's public key is compressed.
/// * `op_return_total` - Exact total size of all data-carrier outputs.
///
/// # Returns
/// The estimated fee in satoshis.
pub fn estimate_fee(
    n_inputs: usize,
    n_outputs: usize,
    sat_per_byte: u64,
    compressed: bool,
    op_return_total: usize,
) -> u64 {
    if sat_per_byte == 0 {
        return 0;
    }

    let input_size = if compressed {
        P2PKH_INPUT_SIZE_COMPRESSED
    } else {
        P2PKH_INPUT_SIZE_UNCOMPRESSED
    };

    let estimated_size = TX_OVERHEAD
        + n_inputs as u64 * input_size
        + VarInt::from(n_inputs).length() as u64
        + n_outputs as u64 * P2PKH_OUTPUT_SIZE
        + VarInt::from(n_outputs).length() as u64
        + op_return_total as u64;

    let estimated_fee = estimated_size * sat_per_byte;

    log::debug!(
        "estimated fee: {} satoshis for {} bytes",
        estimated_fee,
        estimated_size
    );

    estimated_fee
}
