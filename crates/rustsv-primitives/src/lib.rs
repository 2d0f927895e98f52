/// rustsv - Hashing, binary codec, and secp256k1 key primitives.
///
/// Provides the hash functions, VarInt/reader/writer utilities, chain hash
/// type, and EC key material used by the higher-level script and
/// transaction crates.

pub mod chainhash;
pub mod ec;
pub mod hash;
pub mod util;

mod error;
pub use error::PrimitivesError;
