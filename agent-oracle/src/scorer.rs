//! Bridge from a [`TextOracle`] to the memory store's [`RelevanceScorer`].

use agent_memory::{MemoryError, MemoryResult, RelevanceScorer};
use async_trait::async_trait;

use crate::oracle::TextOracle;

/// Scores memories by asking an oracle, one prompt per memory.
///
/// Failures are reported as [`MemoryError::Scoring`]; the store replaces them
/// with its fallback relevance.
#[derive(Debug)]
pub struct OracleRelevance<'a, O: ?Sized> {
    oracle: &'a O,
}

impl<'a, O: ?Sized> OracleRelevance<'a, O> {
    /// Borrows `oracle` for scoring.
    #[must_use]
    pub const fn new(oracle: &'a O) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl<'a, O> RelevanceScorer for OracleRelevance<'a, O>
where
    O: TextOracle + ?Sized,
{
    async fn relevance(&self, content: &str, query: &str) -> MemoryResult<f64> {
        self.oracle
            .score_relevance(content, query)
            .await
            .map_err(|err| MemoryError::scoring(err.to_string()))
    }
}
