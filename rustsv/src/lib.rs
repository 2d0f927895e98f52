#![deny(missing_docs)]

//! # rustsv
//!
//! BSV transaction construction, signing, and serialization.
//!
//! Re-exports all rustsv components for convenient single-crate usage.

pub use rustsv_chain as chain;
pub use rustsv_primitives as primitives;
pub use rustsv_script as script;
pub use rustsv_transaction as transaction;
pub use rustsv_wallet as wallet;
