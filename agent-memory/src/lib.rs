//! Memory for agents.
//!
//! [`MemoryStore`] keeps a bounded set of [`MemoryEntry`] values, evicts the
//! least important one when full, prunes by age on request and ranks entries
//! against a query through a pluggable [`RelevanceScorer`].

#![warn(missing_docs, clippy::pedantic)]

mod entry;
mod error;
mod scorer;
mod store;

pub use entry::MemoryEntry;
pub use error::{MemoryError, MemoryResult};
pub use scorer::{FALLBACK_RELEVANCE, RelevanceScorer};
pub use store::{AddOutcome, MemoryConfig, MemoryStore, RankedMemory};
