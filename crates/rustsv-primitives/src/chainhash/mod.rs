//! Chain hash type for transaction identification.
//!
//! Provides a `Hash` type, a 32-byte array displayed as byte-reversed hex,
//! matching Bitcoin's convention for transaction IDs: internal
//! (little-endian) storage, big-endian display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PrimitivesError;

/// Size of a Hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Maximum hex string length for a Hash (64 hex characters).
pub const MAX_HASH_STRING_SIZE: usize = HASH_SIZE * 2;

/// A 32-byte hash used for transaction IDs.
///
/// When displayed as a string, the bytes are reversed to match Bitcoin's
/// standard representation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    /// Create a Hash from a raw 32-byte array.
    ///
    /// The bytes are stored as-is (internal byte order).
    ///
    /// # Arguments
    /// * `bytes` - The 32 bytes in internal (little-endian) order.
    ///
    /// # Returns
    /// A new `Hash`.
    pub fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    /// Create a Hash from a byte slice in internal order.
    ///
    /// # Arguments
    /// * `bytes` - A slice that must be exactly 32 bytes.
    ///
    /// # Returns
    /// `Ok(Hash)` if the slice is 32 bytes, or an error otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != HASH_SIZE {
            return Err(PrimitivesError::InvalidHash(format!(
                "invalid hash length of {}, want {}",
                bytes.len(),
                HASH_SIZE
            )));
        }
        let mut arr = [0u8; HASH_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Hash(arr))
    }

    /// Create a Hash from a byte-reversed (display order) hex string.
    ///
    /// Short strings are zero-padded on the high end; odd-length strings
    /// get a leading zero inserted.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string of up to 64 characters.
    ///
    /// # Returns
    /// `Ok(Hash)` on success, or an error for invalid input.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Ok(Hash::default());
        }
        if hex_str.len() > MAX_HASH_STRING_SIZE {
            return Err(PrimitivesError::InvalidHash(format!(
                "max hash string length is {} characters",
                MAX_HASH_STRING_SIZE
            )));
        }

        let padded = if hex_str.len() % 2 != 0 {
            format!("0{}", hex_str)
        } else {
            hex_str.to_string()
        };

        // Right-align the decoded bytes in a 32-byte display-order buffer,
        // then reverse into internal order.
        let decoded = hex::decode(&padded)?;
        let mut display_order = [0u8; HASH_SIZE];
        let offset = HASH_SIZE - decoded.len();
        display_order[offset..].copy_from_slice(&decoded);

        let mut internal = [0u8; HASH_SIZE];
        for i in 0..HASH_SIZE {
            internal[i] = display_order[HASH_SIZE - 1 - i];
        }

        Ok(Hash(internal))
    }

    /// Access the internal byte array as a reference.
    ///
    /// # Returns
    /// A reference to the 32-byte internal array.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Render the hash as a display-order (byte-reversed) hex string.
    ///
    /// # Returns
    /// A 64-character hex string.
    pub fn to_hex(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        hex::encode(reversed)
    }
}

impl fmt::Display for Hash {
    /// Display the hash in byte-reversed hex (Bitcoin convention).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Hash {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash::from_hex(s)
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Hash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_roundtrip() {
        let display = "45be95d2f2c64e99518ffbbce03fb15a7758f20ee5eecf0df07938d977add71d";
        let h = Hash::from_hex(display).expect("should parse");
        assert_eq!(h.to_hex(), display);
        assert_eq!(format!("{}", h), display);
    }

    #[test]
    fn test_internal_order_is_reversed() {
        let display = "0000000000000000000000000000000000000000000000000000000000000001";
        let h = Hash::from_hex(display).expect("should parse");
        assert_eq!(h.as_bytes()[0], 0x01);
        assert_eq!(h.as_bytes()[31], 0x00);
    }

    #[test]
    fn test_empty_string_is_zero_hash() {
        let h = Hash::from_hex("").expect("empty should parse");
        assert_eq!(h, Hash::default());
    }

    #[test]
    fn test_too_long_rejected() {
        let s = "00".repeat(33);
        assert!(Hash::from_hex(&s).is_err());
    }

    #[test]
    fn test_from_bytes_wrong_length() {
        assert!(Hash::from_bytes(&[0u8; 31]).is_err());
        assert!(Hash::from_bytes(&[0u8; 32]).is_ok());
    }
}
