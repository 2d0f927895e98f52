/// Bitcoin SV address handling.
///
/// Supports P2PKH address generation from public key hashes, address
/// validation, and mainnet/testnet discrimination. Uses Base58Check
/// encoding with SHA-256d checksums.

use std::fmt;

use rustsv_primitives::hash::{hash160, sha256d};

use crate::ScriptError;

/// Mainnet P2PKH address version byte.
const MAINNET_P2PKH: u8 = 0x00;
/// Testnet P2PKH address version byte.
const TESTNET_P2PKH: u8 = 0x6f;

/// Network type for address prefix selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    /// Mainnet (address prefix 0x00, starts with '1').
    Mainnet,
    /// Testnet (address prefix 0x6f, starts with 'm' or 'n').
    Testnet,
}

/// A P2PKH address.
///
/// Contains the 20-byte public key hash and the network it belongs to.
/// Can be serialized to/from the Base58Check string format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The human-readable Base58Check address string.
    pub address_string: String,
    /// The 20-byte RIPEMD-160(SHA-256(pubkey)) hash.
    pub public_key_hash: [u8; 20],
    /// The network this address belongs to.
    pub network: Network,
}

impl Address {
    /// Parse a Base58Check-encoded address string.
    ///
    /// Decodes the string, validates the checksum, and detects the network
    /// from the version byte (0x00 = mainnet, 0x6f = testnet).
    ///
    /// # Arguments
    /// * `addr` - The Base58Check address string.
    ///
    /// # Returns
    /// An `Address` or an error if the string is invalid.
    pub fn from_string(addr: &str) -> Result<Self, ScriptError> {
        let decoded = bs58::decode(addr)
            .into_vec()
            .map_err(|_| ScriptError::InvalidAddress(format!("bad char for '{}'", addr)))?;

        if decoded.len() != 25 {
            return Err(ScriptError::InvalidAddressLength(addr.to_string()));
        }

        // Verify checksum: last 4 bytes should equal sha256d of first 21 bytes.
        let checksum = sha256d(&decoded[..21]);
        if decoded[21..25] != checksum[..4] {
            return Err(ScriptError::ChecksumFailed);
        }

        let network = match decoded[0] {
            MAINNET_P2PKH => Network::Mainnet,
            TESTNET_P2PKH => Network::Testnet,
            _ => return Err(ScriptError::UnsupportedAddress(addr.to_string())),
        };

        let mut pkh = [0u8; 20];
        pkh.copy_from_slice(&decoded[1..21]);

        Ok(Address {
            address_string: addr.to_string(),
            public_key_hash: pkh,
            network,
        })
    }

    /// Create an address from a 20-byte public key hash.
    ///
    /// # Arguments
    /// * `hash` - The 20-byte hash160 of the public key.
    /// * `network` - The target network (Mainnet or Testnet).
    ///
    /// # Returns
    /// A new `Address` with the encoded Base58Check string.
    pub fn from_public_key_hash(hash: &[u8; 20], network: Network) -> Self {
        let version = match network {
            Network::Mainnet => MAINNET_P2PKH,
            Network::Testnet => TESTNET_P2PKH,
        };

        let mut payload = Vec::with_capacity(25);
        payload.push(version);
        payload.extend_from_slice(hash);
        let checksum = sha256d(&payload);
        payload.extend_from_slice(&checksum[..4]);

        let address_string = bs58::encode(&payload).into_string();

        Address {
            address_string,
            public_key_hash: *hash,
            network,
        }
    }

    /// Create an address from raw public key bytes.
    ///
    /// Computes hash160 of the SEC1-encoded public key bytes.
    ///
    /// # Arguments
    /// * `pub_key` - SEC1 public key bytes (compressed or uncompressed).
    /// * `network` - The target network.
    ///
    /// # Returns
    /// A new `Address`.
    pub fn from_public_key_bytes(pub_key: &[u8], network: Network) -> Self {
        let h = hash160(pub_key);
        Self::from_public_key_hash(&h, network)
    }

    /// Create an address from a hex-encoded public key string.
    ///
    /// # Arguments
    /// * `pub_key_hex` - Hex-encoded public key (compressed or uncompressed).
    /// * `network` - The target network.
    ///
    /// # Returns
    /// A new `Address`, or an error if the hex is invalid.
    pub fn from_public_key_string(pub_key_hex: &str, network: Network) -> Result<Self, ScriptError> {
        let pub_key_bytes =
            hex::decode(pub_key_hex).map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        Ok(Self::from_public_key_bytes(&pub_key_bytes, network))
    }
}

impl fmt::Display for Address {
    /// Display the address as its Base58Check string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}

#[cfg(test)]
mod tests {
    //! Tests for address parsing, generation, and validation: mainnet and
    //! testnet round-trips, checksum validation, network detection, and
    //! error cases for short/unsupported addresses.

    use super::*;

    /// The public key hash shared across several test vectors.
    const TEST_PUBLIC_KEY_HASH: &str = "00ac6144c4db7b5790f343cf0477a65fb8a02eb7";

    // -----------------------------------------------------------------------
    // from_string
    // -----------------------------------------------------------------------

    #[test]
    fn test_from_string_mainnet() {
        let address_str = "1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr";
        let addr = Address::from_string(address_str).expect("should parse mainnet");
        assert_eq!(addr.address_string, address_str);
        assert_eq!(
            hex::encode(addr.public_key_hash),
            "8fe80c75c9560e8b56ed64ea3c26e18d2c52211b"
        );
        assert_eq!(addr.network, Network::Mainnet);
    }

    #[test]
    fn test_from_string_testnet() {
        let address_str = "mtdruWYVEV1wz5yL7GvpBj4MgifCB7yhPd";
        let addr = Address::from_string(address_str).expect("should parse testnet");
        assert_eq!(
            hex::encode(addr.public_key_hash),
            "8fe80c75c9560e8b56ed64ea3c26e18d2c52211b"
        );
        assert_eq!(addr.network, Network::Testnet);
    }

    /// Mainnet and testnet addresses for the same PKH decode to the same hash.
    #[test]
    fn test_same_pkh_different_networks() {
        let mainnet = Address::from_string("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr").unwrap();
        let testnet = Address::from_string("mtdruWYVEV1wz5yL7GvpBj4MgifCB7yhPd").unwrap();
        assert_eq!(mainnet.public_key_hash, testnet.public_key_hash);
    }

    #[test]
    fn test_from_string_short_address() {
        assert!(Address::from_string("ADD8E55").is_err());
    }

    #[test]
    fn test_from_string_unsupported_version() {
        assert!(Address::from_string("27BvY7rFguYQvEL872Y7Fo77Y3EBApC2EK").is_err());
    }

    // -----------------------------------------------------------------------
    // from_public_key_*
    // -----------------------------------------------------------------------

    #[test]
    fn test_from_public_key_string_mainnet() {
        let addr = Address::from_public_key_string(
            "026cf33373a9f3f6c676b75b543180703df225f7f8edbffedc417718a8ad4e89ce",
            Network::Mainnet,
        )
        .expect("should create address");
        assert_eq!(hex::encode(addr.public_key_hash), TEST_PUBLIC_KEY_HASH);
        assert_eq!(addr.address_string, "114ZWApV4EEU8frr7zygqQcB1V2BodGZuS");
    }

    #[test]
    fn test_from_public_key_string_testnet() {
        let addr = Address::from_public_key_string(
            "026cf33373a9f3f6c676b75b543180703df225f7f8edbffedc417718a8ad4e89ce",
            Network::Testnet,
        )
        .expect("should create address");
        assert_eq!(addr.address_string, "mfaWoDuTsFfiunLTqZx4fKpVsUctiDV9jk");
    }

    #[test]
    fn test_from_public_key_hash_roundtrip() {
        let hash_bytes = hex::decode(TEST_PUBLIC_KEY_HASH).expect("valid hex");
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&hash_bytes);

        let addr = Address::from_public_key_hash(&hash, Network::Mainnet);
        let parsed = Address::from_string(&addr.address_string).expect("should parse back");

        assert_eq!(addr.public_key_hash, parsed.public_key_hash);
        assert_eq!(addr.address_string, parsed.address_string);
        assert_eq!(addr.network, parsed.network);
    }

    #[test]
    fn test_from_public_key_string_invalid() {
        assert!(Address::from_public_key_string("invalid_pubkey", Network::Mainnet).is_err());
    }
}
