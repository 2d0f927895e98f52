/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction structure is invalid (e.g. an out-of-range input index).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// An error occurred during input signing (e.g. missing source output).
    #[error("signing error: {0}")]
    SigningError(String),

    /// An error occurred during binary/hex serialization or deserialization.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// The selected inputs cannot cover the outputs plus the fee.
    #[error("balance {balance} is less than {required} (including fee)")]
    InsufficientFunds {
        /// Total satoshis available in the selected inputs.
        balance: u64,
        /// Total satoshis required: outputs plus estimated fee.
        required: u64,
    },

    /// No unspent outputs were supplied.
    #[error("transactions must have at least one unspent")]
    EmptyUnspents,

    /// An unspent output's locking script could not be decoded.
    #[error("malformed unspent: {0}")]
    MalformedUnspent(String),

    /// A payment amount could not be converted to satoshis.
    #[error("conversion error: {0}")]
    ConversionError(String),

    /// An underlying script error (forwarded from `rustsv-script`).
    #[error("script error: {0}")]
    Script(#[from] rustsv_script::ScriptError),

    /// An underlying primitives error (forwarded from `rustsv-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] rustsv_primitives::PrimitivesError),
}
