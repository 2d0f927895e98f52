//! Binary codec utilities for the Bitcoin wire format.
//!
//! Provides VarInt encoding/decoding, `TxReader`/`TxWriter` for reading and
//! writing protocol binary data, minimal-width integer encoding, and the
//! hex helpers used for txid display-order conversion.

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// VarInt
// ---------------------------------------------------------------------------

/// A Bitcoin protocol variable-length integer.
///
/// VarInt is used in transaction data to indicate the number of upcoming
/// fields or the length of an upcoming field. The encoding uses 1, 3, 5, or
/// 9 bytes depending on the magnitude of the value.
///
/// See <http://learnmeabitcoin.com/glossary/varint>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Decode a VarInt from a byte slice.
    ///
    /// Returns the decoded value and the number of bytes consumed.
    ///
    /// # Arguments
    /// * `data` - Byte slice starting with a VarInt encoding.
    ///
    /// # Returns
    /// `Ok((VarInt, bytes_consumed))`, or an error if the slice is truncated.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), PrimitivesError> {
        let first = *data.first().ok_or(PrimitivesError::UnexpectedEof)?;
        match first {
            0xff => {
                if data.len() < 9 {
                    return Err(PrimitivesError::UnexpectedEof);
                }
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&data[1..9]);
                Ok((VarInt(u64::from_le_bytes(buf)), 9))
            }
            0xfe => {
                if data.len() < 5 {
                    return Err(PrimitivesError::UnexpectedEof);
                }
                let val = u32::from_le_bytes([data[1], data[2], data[3], data[4]]) as u64;
                Ok((VarInt(val), 5))
            }
            0xfd => {
                if data.len() < 3 {
                    return Err(PrimitivesError::UnexpectedEof);
                }
                let val = u16::from_le_bytes([data[1], data[2]]) as u64;
                Ok((VarInt(val), 3))
            }
            b => Ok((VarInt(b as u64), 1)),
        }
    }

    /// Return the wire-format byte length of this VarInt.
    ///
    /// # Returns
    /// 1, 3, 5, or 9 depending on the value.
    pub fn length(&self) -> usize {
        if self.0 < 0xfd {
            1
        } else if self.0 <= 0xffff {
            3
        } else if self.0 <= 0xffff_ffff {
            5
        } else {
            9
        }
    }

    /// Encode the VarInt into a new byte vector.
    ///
    /// # Returns
    /// A `Vec<u8>` of 1, 3, 5, or 9 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let v = self.0;
        if v < 0xfd {
            vec![v as u8]
        } else if v <= 0xffff {
            let mut buf = vec![0xfd];
            buf.extend_from_slice(&(v as u16).to_le_bytes());
            buf
        } else if v <= 0xffff_ffff {
            let mut buf = vec![0xfe];
            buf.extend_from_slice(&(v as u32).to_le_bytes());
            buf
        } else {
            let mut buf = vec![0xff];
            buf.extend_from_slice(&v.to_le_bytes());
            buf
        }
    }

    /// Return the underlying u64 value.
    ///
    /// # Returns
    /// The integer value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        VarInt(v)
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

// ---------------------------------------------------------------------------
// Minimal-width integer encoding
// ---------------------------------------------------------------------------

/// Byte order for minimal-width integer encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

/// Encode an unsigned integer using the smallest number of bytes that can
/// represent it, minimum one byte.
///
/// Zero encodes as a single `0x00` byte.
///
/// # Arguments
/// * `n` - The value to encode.
/// * `order` - Output byte order.
///
/// # Returns
/// A `Vec<u8>` of 1 to 8 bytes.
pub fn int_to_minimal_bytes(n: u64, order: ByteOrder) -> Vec<u8> {
    let width = ((64 - n.leading_zeros() as usize) + 7) / 8;
    let width = width.max(1);
    let be = n.to_be_bytes();
    let mut bytes = be[8 - width..].to_vec();
    if order == ByteOrder::Little {
        bytes.reverse();
    }
    bytes
}

// ---------------------------------------------------------------------------
// Hex helpers
// ---------------------------------------------------------------------------

/// Decode a hex string into bytes, tolerating odd-length input.
///
/// An odd-length string gets a leading zero inserted before decoding, so
/// `"f"` decodes to `[0x0f]`.
///
/// # Arguments
/// * `hex_str` - The hex string to decode.
///
/// # Returns
/// The decoded bytes, or an error for non-hex characters.
pub fn hex_to_bytes(hex_str: &str) -> Result<Vec<u8>, PrimitivesError> {
    if hex_str.len() % 2 != 0 {
        let padded = format!("0{}", hex_str);
        Ok(hex::decode(padded)?)
    } else {
        Ok(hex::decode(hex_str)?)
    }
}

/// Encode bytes as a lowercase hex string.
///
/// # Arguments
/// * `bytes` - The bytes to encode.
///
/// # Returns
/// A lowercase hex string.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Reverse the byte order of a hex string.
///
/// Transaction IDs are stored and hashed in internal (little-endian) byte
/// order but displayed reversed; this converts between the two forms.
///
/// # Arguments
/// * `hex_str` - The hex string to flip.
///
/// # Returns
/// The byte-reversed hex string, or an error for invalid hex.
pub fn reverse_hex_byte_order(hex_str: &str) -> Result<String, PrimitivesError> {
    let mut bytes = hex_to_bytes(hex_str)?;
    bytes.reverse();
    Ok(hex::encode(bytes))
}

// ---------------------------------------------------------------------------
// TxReader
// ---------------------------------------------------------------------------

/// A cursor-based reader for Bitcoin protocol binary data.
///
/// Wraps a byte slice and maintains a read position, providing methods
/// to read fixed-size integers and VarInt values in little-endian order.
pub struct TxReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> TxReader<'a> {
    /// Create a new reader over the given byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from.
    ///
    /// # Returns
    /// A `TxReader` positioned at the start of the data.
    pub fn new(data: &'a [u8]) -> Self {
        TxReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance the position.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to read.
    ///
    /// # Returns
    /// A byte slice of length `n`, or an error if insufficient data remains.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        if self.pos + n > self.data.len() {
            return Err(PrimitivesError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a single byte and advance the position.
    ///
    /// # Returns
    /// The byte value, or an error if no data remains.
    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Read a little-endian u16 and advance the position by 2 bytes.
    ///
    /// # Returns
    /// The decoded u16, or an error if insufficient data.
    pub fn read_u16_le(&mut self) -> Result<u16, PrimitivesError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a little-endian u32 and advance the position by 4 bytes.
    ///
    /// # Returns
    /// The decoded u32, or an error if insufficient data.
    pub fn read_u32_le(&mut self) -> Result<u32, PrimitivesError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a little-endian u64 and advance the position by 8 bytes.
    ///
    /// # Returns
    /// The decoded u64, or an error if insufficient data.
    pub fn read_u64_le(&mut self) -> Result<u64, PrimitivesError> {
        let bytes = self.read_bytes(8)?;
        Ok(u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    /// Read a VarInt and advance the position accordingly.
    ///
    /// # Returns
    /// The decoded `VarInt`, or an error if insufficient data.
    pub fn read_varint(&mut self) -> Result<VarInt, PrimitivesError> {
        let first = self.read_u8()?;
        match first {
            0xff => Ok(VarInt(self.read_u64_le()?)),
            0xfe => Ok(VarInt(self.read_u32_le()? as u64)),
            0xfd => Ok(VarInt(self.read_u16_le()? as u64)),
            b => Ok(VarInt(b as u64)),
        }
    }

    /// Return the number of bytes remaining.
    ///
    /// # Returns
    /// The count of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

// ---------------------------------------------------------------------------
// TxWriter
// ---------------------------------------------------------------------------

/// A buffer-based writer for Bitcoin protocol binary data.
///
/// Wraps a `Vec<u8>` and provides methods to append fixed-size integers
/// and VarInt values in little-endian order.
pub struct TxWriter {
    buf: Vec<u8>,
}

impl TxWriter {
    /// Create a new empty writer.
    ///
    /// # Returns
    /// A `TxWriter` with an empty internal buffer.
    pub fn new() -> Self {
        TxWriter { buf: Vec::new() }
    }

    /// Create a new writer with a pre-allocated capacity.
    ///
    /// # Arguments
    /// * `capacity` - Initial byte capacity of the internal buffer.
    ///
    /// # Returns
    /// A `TxWriter` with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        TxWriter {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append raw bytes to the buffer.
    ///
    /// # Arguments
    /// * `bytes` - The bytes to append.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte to the buffer.
    ///
    /// # Arguments
    /// * `val` - The byte value.
    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Append a little-endian u32 (4 bytes) to the buffer.
    ///
    /// # Arguments
    /// * `val` - The u32 value.
    pub fn write_u32_le(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian u64 (8 bytes) to the buffer.
    ///
    /// # Arguments
    /// * `val` - The u64 value.
    pub fn write_u64_le(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a VarInt to the buffer.
    ///
    /// # Arguments
    /// * `varint` - The VarInt value to encode and append.
    pub fn write_varint(&mut self, varint: VarInt) {
        let bytes = varint.to_bytes();
        self.buf.extend_from_slice(&bytes);
    }

    /// Consume the writer and return the accumulated bytes.
    ///
    /// # Returns
    /// The internal byte buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Return a reference to the current buffer contents.
    ///
    /// # Returns
    /// A byte slice of the written data.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Return the current length of the buffer.
    ///
    /// # Returns
    /// The number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the buffer is empty.
    ///
    /// # Returns
    /// `true` if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for TxWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- VarInt boundary lengths --

    #[test]
    fn test_varint_byte_length() {
        assert_eq!(VarInt(0).to_bytes().len(), 1);
        assert_eq!(VarInt(1).to_bytes().len(), 1);
        assert_eq!(VarInt(252).to_bytes().len(), 1);
        assert_eq!(VarInt(253).to_bytes().len(), 3);
        assert_eq!(VarInt(255).to_bytes().len(), 3);
        assert_eq!(VarInt(65535).to_bytes().len(), 3);
        assert_eq!(VarInt(65536).to_bytes().len(), 5);
        assert_eq!(VarInt(4294967295).to_bytes().len(), 5);
        assert_eq!(VarInt(4294967296).to_bytes().len(), 9);
        assert_eq!(VarInt(u64::MAX).to_bytes().len(), 9);
    }

    #[test]
    fn test_varint_length_matches_encoding() {
        for v in [
            0u64,
            1,
            252,
            253,
            255,
            65535,
            65536,
            4294967295,
            4294967296,
            u64::MAX,
        ] {
            assert_eq!(VarInt(v).length(), VarInt(v).to_bytes().len());
        }
    }

    // -- VarInt encode/decode round-trip --

    #[test]
    fn test_varint_roundtrip() {
        for v in [
            0u64,
            1,
            252,
            253,
            255,
            65535,
            65536,
            4294967295,
            4294967296,
        ] {
            let encoded = VarInt(v).to_bytes();
            let (decoded, consumed) = VarInt::from_bytes(&encoded).unwrap();
            assert_eq!(decoded.value(), v, "round-trip mismatch for {}", v);
            assert_eq!(consumed, encoded.len(), "consumed length mismatch for {}", v);
        }
    }

    #[test]
    fn test_varint_exact_encodings() {
        let cases: Vec<(u64, Vec<u8>)> = vec![
            (0, vec![0x00]),
            (1, vec![0x01]),
            (252, vec![0xfc]),
            (253, vec![0xfd, 0xfd, 0x00]),
            (65535, vec![0xfd, 0xff, 0xff]),
            (65536, vec![0xfe, 0x00, 0x00, 0x01, 0x00]),
            (4294967295, vec![0xfe, 0xff, 0xff, 0xff, 0xff]),
            (
                4294967296,
                vec![0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00],
            ),
        ];
        for (value, expected) in cases {
            assert_eq!(VarInt(value).to_bytes(), expected, "encoding for {}", value);
        }
    }

    #[test]
    fn test_varint_truncated_decode() {
        assert!(VarInt::from_bytes(&[]).is_err());
        assert!(VarInt::from_bytes(&[0xfd, 0x01]).is_err());
        assert!(VarInt::from_bytes(&[0xfe, 0x01, 0x02]).is_err());
        assert!(VarInt::from_bytes(&[0xff, 0x01, 0x02, 0x03]).is_err());
    }

    // -- Minimal-width integers --

    #[test]
    fn test_int_to_minimal_bytes() {
        assert_eq!(int_to_minimal_bytes(0, ByteOrder::Big), vec![0x00]);
        assert_eq!(int_to_minimal_bytes(1, ByteOrder::Big), vec![0x01]);
        assert_eq!(int_to_minimal_bytes(255, ByteOrder::Big), vec![0xff]);
        assert_eq!(int_to_minimal_bytes(256, ByteOrder::Big), vec![0x01, 0x00]);
        assert_eq!(
            int_to_minimal_bytes(256, ByteOrder::Little),
            vec![0x00, 0x01]
        );
        assert_eq!(
            int_to_minimal_bytes(0x0102_0304, ByteOrder::Little),
            vec![0x04, 0x03, 0x02, 0x01]
        );
    }

    // -- Hex helpers --

    #[test]
    fn test_hex_to_bytes_odd_length() {
        assert_eq!(hex_to_bytes("f").unwrap(), vec![0x0f]);
        assert_eq!(hex_to_bytes("fff").unwrap(), vec![0x0f, 0xff]);
    }

    #[test]
    fn test_hex_to_bytes_invalid() {
        assert!(hex_to_bytes("zz").is_err());
    }

    #[test]
    fn test_reverse_hex_byte_order() {
        assert_eq!(reverse_hex_byte_order("0102ff").unwrap(), "ff0201");
        // Flipping twice restores the original.
        let txid = "45be95d2f2c64e99518ffbbce03fb15a7758f20ee5eecf0df07938d977add71d";
        let flipped = reverse_hex_byte_order(txid).unwrap();
        assert_eq!(reverse_hex_byte_order(&flipped).unwrap(), txid);
    }

    // -- TxReader / TxWriter round-trip --

    #[test]
    fn test_reader_writer_roundtrip() {
        let mut writer = TxWriter::new();
        writer.write_u8(0x42);
        writer.write_u32_le(0xDEADBEEF);
        writer.write_u64_le(0x0102030405060708);
        writer.write_varint(VarInt(300));
        writer.write_bytes(b"hello");

        let data = writer.into_bytes();
        let mut reader = TxReader::new(&data);

        assert_eq!(reader.read_u8().unwrap(), 0x42);
        assert_eq!(reader.read_u32_le().unwrap(), 0xDEADBEEF);
        assert_eq!(reader.read_u64_le().unwrap(), 0x0102030405060708);
        assert_eq!(reader.read_varint().unwrap(), VarInt(300));
        assert_eq!(reader.read_bytes(5).unwrap(), b"hello");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_reader_eof() {
        let mut reader = TxReader::new(&[0x01]);
        assert!(reader.read_u8().is_ok());
        assert!(reader.read_u8().is_err());
    }

    #[test]
    fn test_reader_varint_sizes() {
        let mut reader = TxReader::new(&[0x05]);
        assert_eq!(reader.read_varint().unwrap(), VarInt(5));

        let mut reader = TxReader::new(&[0xfd, 0x00, 0x01]);
        assert_eq!(reader.read_varint().unwrap(), VarInt(256));

        let mut reader = TxReader::new(&[0xfe, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(reader.read_varint().unwrap(), VarInt(65536));

        let mut reader = TxReader::new(&[0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(reader.read_varint().unwrap(), VarInt(4294967296));
    }
}
