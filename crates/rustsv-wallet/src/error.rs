/// Error type for wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// An error from the transaction engine.
    #[error("transaction error: {0}")]
    Transaction(#[from] rustsv_transaction::TransactionError),

    /// An error from a chain service or the rate cache.
    #[error("chain error: {0}")]
    Chain(#[from] rustsv_chain::ChainError),

    /// An error from script or address handling.
    #[error("script error: {0}")]
    Script(#[from] rustsv_script::ScriptError),

    /// An error from key material handling.
    #[error("key error: {0}")]
    Key(#[from] rustsv_primitives::PrimitivesError),
}
