//! Script templates for the transaction types this engine emits.
//!
//! P2PKH locking/unlocking script construction and per-input signing.
//! Data-carrier (OP_RETURN) scripts are built by `rustsv_script::data`.

pub mod p2pkh;
