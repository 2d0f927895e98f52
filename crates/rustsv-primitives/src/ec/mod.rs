//! secp256k1 key material and ECDSA signatures.
//!
//! The signing capability consumed by the transaction crate: a private key
//! that signs 32-byte digests with RFC6979 deterministic nonces and emits
//! canonical low-S DER signatures.

pub mod private_key;
pub mod public_key;
pub mod signature;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::Signature;
