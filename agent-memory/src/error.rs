//! Error types for the memory subsystem.

use thiserror::Error;

/// Errors emitted by memory components.
///
/// None of these ever escape [`MemoryStore::recall`](crate::MemoryStore::recall):
/// scoring failures are absorbed into the fallback relevance.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// A relevance scorer could not produce a usable score.
    #[error("relevance scoring failed: {reason}")]
    Scoring {
        /// Human-readable reason describing the failure.
        reason: String,
    },
}

impl MemoryError {
    /// Helper to construct scoring errors from string-like values.
    #[must_use]
    pub fn scoring(reason: impl Into<String>) -> Self {
        Self::Scoring {
            reason: reason.into(),
        }
    }
}

/// Result type alias for memory operations.
pub type MemoryResult<T> = Result<T, MemoryError>;
