/// rustsv - Script construction and address handling.
///
/// Provides the Bitcoin Script type, opcode definitions, pushdata chunk
/// parsing, P2PKH address generation/validation, and OP_RETURN data-carrier
/// payload construction.

pub mod address;
pub mod chunk;
pub mod data;
pub mod opcodes;
pub mod script;

mod error;
pub use address::{Address, Network};
pub use chunk::ScriptChunk;
pub use error::ScriptError;
pub use script::Script;
