//! OP_RETURN data-carrier payloads.
//!
//! Builds the provably unspendable scripts used to embed arbitrary data
//! on-chain, chunks long messages into bounded-size payloads, and exposes
//! the exact byte-size formulas the fee estimator needs.

use crate::chunk::encode_push_datas;
use crate::opcodes::{OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4, OP_RETURN};
use crate::{Script, ScriptError};

/// Maximum bytes carried per data output.
///
/// Policy value, not a protocol constant: BSV miners accept OP_RETURN
/// payloads up to 100 kB since January 2019. The real ceiling is total
/// transaction size.
pub const MESSAGE_LIMIT: usize = 100_000;

/// Compute the carrier length prefix for an OP_RETURN payload.
///
/// Selection: length <= 0x4c gets a bare single-byte length; <= 0xFF gets
/// OP_PUSHDATA1 + 1 byte; <= 0xFFFF gets OP_PUSHDATA2 + 2 bytes LE; larger
/// payloads get OP_PUSHDATA4 + 4 bytes LE.
///
/// # Arguments
/// * `data_len` - The payload length in bytes.
///
/// # Returns
/// The prefix bytes to place between OP_RETURN and the payload.
pub fn op_pushdata_code(data_len: usize) -> Vec<u8> {
    if data_len <= 0x4c {
        vec![data_len as u8]
    } else if data_len <= 0xff {
        vec![OP_PUSHDATA1, data_len as u8]
    } else if data_len <= 0xffff {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        buf
    } else {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        buf
    }
}

/// Build an OP_RETURN data-carrier script for a payload.
///
/// Produces `OP_RETURN <length prefix> <payload>`. The output carrying this
/// script always has a zero amount.
///
/// # Arguments
/// * `payload` - The raw data bytes to embed.
///
/// # Returns
/// The carrier `Script`.
pub fn build_data_script(payload: &[u8]) -> Script {
    let mut bytes = Vec::with_capacity(1 + 5 + payload.len());
    bytes.push(OP_RETURN);
    bytes.extend_from_slice(&op_pushdata_code(payload.len()));
    bytes.extend_from_slice(payload);
    Script::from_bytes(&bytes)
}

/// Build an OP_RETURN script from pre-encoded pushdata bytes.
///
/// The caller supplies the pushdata stream (each element already carrying
/// its own push prefix, see [`encode_data_parts`]); it is appended verbatim
/// after OP_RETURN.
///
/// # Arguments
/// * `pushdata` - Pre-encoded pushdata bytes.
///
/// # Returns
/// The carrier `Script`.
pub fn build_raw_data_script(pushdata: &[u8]) -> Script {
    let mut bytes = Vec::with_capacity(1 + pushdata.len());
    bytes.push(OP_RETURN);
    bytes.extend_from_slice(pushdata);
    Script::from_bytes(&bytes)
}

/// Encode multiple data elements into one OP_RETURN pushdata stream.
///
/// Each element gets its own push prefix; the concatenation forms a single
/// payload placed after OP_RETURN (e.g. protocol prefix + body).
///
/// # Arguments
/// * `parts` - The data elements to encode.
///
/// # Returns
/// The pushdata bytes, or an error if the total exceeds [`MESSAGE_LIMIT`]
/// or any part is too large to push.
pub fn encode_data_parts(parts: &[&[u8]]) -> Result<Vec<u8>, ScriptError> {
    let pushdata = encode_push_datas(parts)?;
    if pushdata.len() > MESSAGE_LIMIT {
        return Err(ScriptError::DataTooBig);
    }
    Ok(pushdata)
}

/// Exact byte length of the data-carrier script for a payload length.
///
/// # Arguments
/// * `payload_len` - The payload length in bytes.
///
/// # Returns
/// `1 (OP_RETURN) + prefix + payload` bytes.
pub fn data_script_len(payload_len: usize) -> usize {
    1 + op_pushdata_code(payload_len).len() + payload_len
}

/// Exact serialized size of a whole zero-value data output.
///
/// Covers the 8-byte amount field, the script-length varint, and the
/// carrier script itself. The fee estimator adds this per data output
/// instead of the P2PKH output approximation.
///
/// # Arguments
/// * `payload_len` - The payload length in bytes.
///
/// # Returns
/// The output's full wire size in bytes.
pub fn data_output_len(payload_len: usize) -> usize {
    let script_len = data_script_len(payload_len);
    8 + varint_len(script_len) + script_len
}

/// Exact serialized size of a zero-value output carrying pre-encoded
/// pushdata (see [`build_raw_data_script`]).
///
/// # Arguments
/// * `pushdata_len` - Length of the pre-encoded pushdata stream.
///
/// # Returns
/// The output's full wire size in bytes.
pub fn raw_data_output_len(pushdata_len: usize) -> usize {
    let script_len = 1 + pushdata_len;
    8 + varint_len(script_len) + script_len
}

/// Split a message into chunks no larger than `limit` bytes.
///
/// The final chunk carries the remainder; an empty message yields no chunks.
///
/// # Arguments
/// * `data` - The message bytes.
/// * `limit` - Maximum chunk size, in bytes.
///
/// # Returns
/// The ordered chunks.
pub fn chunk_message(data: &[u8], limit: usize) -> Vec<Vec<u8>> {
    data.chunks(limit).map(|c| c.to_vec()).collect()
}

/// Byte length of a varint for the given value.
fn varint_len(n: usize) -> usize {
    rustsv_primitives::util::VarInt::from(n).length()
}
