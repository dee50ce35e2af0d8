//! Relevance scoring seam used by recall.

use async_trait::async_trait;

use crate::MemoryResult;

/// Relevance substituted whenever a scorer fails or returns an unusable value.
pub const FALLBACK_RELEVANCE: f64 = 0.5;

/// Estimates how relevant a memory's content is to a query.
///
/// Implementations are expected to return values in `[0, 1]`. Anything else
/// (an error, NaN, infinities) is replaced by [`FALLBACK_RELEVANCE`] by the store.
#[async_trait]
pub trait RelevanceScorer: Send + Sync {
    /// Scores `content` against `query`.
    async fn relevance(&self, content: &str, query: &str) -> MemoryResult<f64>;
}
