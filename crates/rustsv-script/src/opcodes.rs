//! Script opcode constants.
//!
//! Only the opcodes this workspace builds or classifies are defined here;
//! the script interpreter itself is out of scope.

/// Push an empty byte array onto the stack.
pub const OP_0: u8 = 0x00;
/// Alias for OP_0.
pub const OP_FALSE: u8 = 0x00;

/// Lowest direct data push opcode (push 1 byte).
pub const OP_DATA_1: u8 = 0x01;
/// Direct push of 20 bytes, as used for a hash160 in P2PKH scripts.
pub const OP_DATA_20: u8 = 0x14;
/// Highest direct data push opcode (push 75 bytes).
pub const OP_DATA_75: u8 = 0x4b;

/// The next byte holds the push length.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// The next 2 bytes (LE) hold the push length.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// The next 4 bytes (LE) hold the push length.
pub const OP_PUSHDATA4: u8 = 0x4e;

/// Marks an output as provably unspendable; the remainder is data.
pub const OP_RETURN: u8 = 0x6a;

/// Duplicate the top stack item.
pub const OP_DUP: u8 = 0x76;

/// Pop, check equality, and fail the script if unequal.
pub const OP_EQUALVERIFY: u8 = 0x88;

/// Hash the top stack item with RIPEMD160(SHA256(x)).
pub const OP_HASH160: u8 = 0xa9;

/// Verify an ECDSA signature against a public key.
pub const OP_CHECKSIG: u8 = 0xac;
