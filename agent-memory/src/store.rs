//! Bounded memory store with importance-based eviction.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::entry::MemoryEntry;
use crate::scorer::{FALLBACK_RELEVANCE, RelevanceScorer};

/// Configuration for the memory store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    capacity: usize,
}

impl MemoryConfig {
    /// Default number of entries retained.
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Creates a configuration with the provided capacity.
    ///
    /// A capacity of zero yields a store that never retains anything.
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Returns the configured capacity.
    #[must_use]
    pub const fn capacity(self) -> usize {
        self.capacity
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// What happened to an entry handed to [`MemoryStore::add`].
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The entry was appended without displacing anything.
    Stored,
    /// The entry was appended after the returned entry was evicted.
    Evicted(MemoryEntry),
    /// The store has zero capacity; the entry was dropped.
    Discarded,
}

impl AddOutcome {
    /// Returns `true` when the new entry is now held by the store.
    #[must_use]
    pub const fn is_stored(&self) -> bool {
        !matches!(self, Self::Discarded)
    }

    /// Returns the evicted entry, if any.
    #[must_use]
    pub fn evicted(&self) -> Option<&MemoryEntry> {
        match self {
            Self::Evicted(entry) => Some(entry),
            _ => None,
        }
    }
}

/// One recall hit together with the numbers that ranked it.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMemory {
    /// Content of the recalled entry.
    pub content: String,
    /// Importance of the recalled entry.
    pub importance: f64,
    /// Relevance used for ranking (the fallback value when `fallback` is set).
    pub relevance: f64,
    /// `relevance * importance`.
    pub score: f64,
    /// Whether the scorer failed and [`FALLBACK_RELEVANCE`] was substituted.
    pub fallback: bool,
}

/// Ordered, capacity-bounded collection of [`MemoryEntry`] values.
///
/// Insertion order is the store order until [`MemoryStore::clear_oldest`]
/// re-sorts the entries by timestamp.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    config: MemoryConfig,
    entries: Vec<MemoryEntry>,
}

impl MemoryStore {
    /// Creates an empty store using the supplied configuration.
    #[must_use]
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            config,
            entries: Vec::with_capacity(config.capacity().min(MemoryConfig::DEFAULT_CAPACITY)),
        }
    }

    /// Creates an empty store holding at most `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(MemoryConfig::new(capacity))
    }

    /// Returns the configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.config.capacity()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries in store order.
    #[must_use]
    pub fn entries(&self) -> &[MemoryEntry] {
        &self.entries
    }

    /// Remembers `content` with the given importance, stamped with the current time.
    pub fn add(&mut self, content: impl Into<String>, importance: f64) -> AddOutcome {
        self.add_entry(MemoryEntry::new(content, importance))
    }

    /// Inserts a prepared entry, evicting the least important one when full.
    ///
    /// Among entries sharing the minimum importance the first in store order is
    /// evicted; `-0.0` and `0.0` count as equal. Importance is otherwise
    /// compared with [`f64::total_cmp`], so a NaN weight sorts above every
    /// number and is evicted last.
    pub fn add_entry(&mut self, entry: MemoryEntry) -> AddOutcome {
        let capacity = self.config.capacity();
        if capacity == 0 {
            debug!(id = %entry.id(), "memory store has zero capacity, discarding entry");
            return AddOutcome::Discarded;
        }

        let evicted = if self.entries.len() >= capacity {
            self.evict_least_important()
        } else {
            None
        };

        self.entries.push(entry);

        match evicted {
            Some(entry) => AddOutcome::Evicted(entry),
            None => AddOutcome::Stored,
        }
    }

    fn evict_least_important(&mut self) -> Option<MemoryEntry> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                signless(a.importance()).total_cmp(&signless(b.importance()))
            })
            .map(|(index, _)| index)?;

        let evicted = self.entries.remove(index);
        debug!(
            id = %evicted.id(),
            importance = evicted.importance(),
            capacity = self.config.capacity(),
            "evicted least important memory"
        );
        Some(evicted)
    }

    /// Ranks every entry against `query` and returns the best `max_results`.
    ///
    /// Each entry costs one sequential call to `scorer`, so latency grows
    /// linearly with the store size. Scorer failures and non-finite relevance
    /// values fall back to [`FALLBACK_RELEVANCE`]. Hits with equal scores keep
    /// their store order (the sort is stable). A NaN score ranks last.
    pub async fn recall_ranked<S>(
        &self,
        query: &str,
        max_results: usize,
        scorer: &S,
    ) -> Vec<RankedMemory>
    where
        S: RelevanceScorer + ?Sized,
    {
        if max_results == 0 || self.entries.is_empty() {
            return Vec::new();
        }

        let mut ranked = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let (relevance, fallback) = match scorer.relevance(entry.content(), query).await {
                Ok(relevance) if relevance.is_finite() => (relevance, false),
                Ok(relevance) => {
                    warn!(id = %entry.id(), relevance, "non-finite relevance, using fallback");
                    (FALLBACK_RELEVANCE, true)
                }
                Err(err) => {
                    warn!(id = %entry.id(), error = %err, "relevance scoring failed, using fallback");
                    (FALLBACK_RELEVANCE, true)
                }
            };

            ranked.push(RankedMemory {
                content: entry.content().to_owned(),
                importance: entry.importance(),
                relevance,
                score: relevance * entry.importance(),
                fallback,
            });
        }

        ranked.sort_by(|a, b| descending_score(a.score, b.score));
        ranked.truncate(max_results);
        ranked
    }

    /// Returns the content of the best `max_results` entries for `query`.
    ///
    /// See [`MemoryStore::recall_ranked`] for ranking and fallback rules.
    pub async fn recall<S>(&self, query: &str, max_results: usize, scorer: &S) -> Vec<String>
    where
        S: RelevanceScorer + ?Sized,
    {
        self.recall_ranked(query, max_results, scorer)
            .await
            .into_iter()
            .map(|hit| hit.content)
            .collect()
    }

    /// Removes the `count` oldest entries, returning how many were removed.
    ///
    /// Survivors are left sorted by timestamp ascending. Entries with equal
    /// timestamps keep their previous relative order.
    pub fn clear_oldest(&mut self, count: usize) -> usize {
        let count = count.min(self.entries.len());
        if count == 0 {
            return 0;
        }

        self.entries.sort_by_key(MemoryEntry::timestamp);
        self.entries.drain(..count);
        debug!(removed = count, remaining = self.entries.len(), "pruned oldest memories");
        count
    }
}

/// Folds `-0.0` into `0.0` so both zeros compare equal under `total_cmp`.
fn signless(value: f64) -> f64 {
    value + 0.0
}

fn descending_score(a: f64, b: f64) -> Ordering {
    let key = |score: f64| if score.is_nan() { f64::NEG_INFINITY } else { signless(score) };
    key(b).total_cmp(&key(a))
}
