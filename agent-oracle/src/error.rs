//! Error types for oracle calls.

use std::time::Duration;

use agent_adapters::traits::AdapterError;
use thiserror::Error;

/// Failures of the text oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The underlying model adapter failed.
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// The oracle did not answer within the configured limit.
    #[error("oracle call timed out after {limit:?}")]
    Timeout {
        /// Limit that elapsed.
        limit: Duration,
    },

    /// The oracle answered with no text.
    #[error("oracle returned an empty response")]
    EmptyResponse,

    /// A numeric score was requested but the reply did not start with a number.
    #[error("oracle reply is not a relevance score: {reply:?}")]
    UnparseableScore {
        /// The raw reply.
        reply: String,
    },
}

/// Result alias for oracle calls.
pub type OracleResult<T> = Result<T, OracleError>;
