/// Error types for chain service and rate operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// An HTTP transport or decoding error from the underlying client.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A service answered with something the client could not interpret.
    #[error("unexpected response from {service}: {detail}")]
    UnexpectedResponse {
        /// The service that produced the response.
        service: String,
        /// What was wrong with it.
        detail: String,
    },

    /// The service rejected a broadcast transaction.
    #[error("broadcast rejected: {0}")]
    BroadcastRejected(String),

    /// Every configured service failed for the requested operation.
    #[error("all services failed for {0}")]
    AllServicesFailed(String),

    /// The currency code is not supported.
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// A decimal amount string could not be parsed.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// An async runtime could not be created for a blocking call.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// An underlying script error (forwarded from `rustsv-script`).
    #[error("script error: {0}")]
    Script(#[from] rustsv_script::ScriptError),
}
