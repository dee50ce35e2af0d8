//! Memory entries held by the store.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single remembered piece of text with its caller-assigned importance.
///
/// Entries are immutable once created; the store only ever moves or drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    id: Uuid,
    content: String,
    importance: f64,
    timestamp: SystemTime,
}

impl MemoryEntry {
    /// Creates an entry stamped with the current wall-clock time.
    #[must_use]
    pub fn new(content: impl Into<String>, importance: f64) -> Self {
        Self::with_timestamp(content, importance, SystemTime::now())
    }

    /// Creates an entry with an explicit creation time.
    #[must_use]
    pub fn with_timestamp(content: impl Into<String>, importance: f64, timestamp: SystemTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            importance,
            timestamp,
        }
    }

    /// Returns the unique identifier for this entry.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the remembered text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the intrinsic importance weight.
    #[must_use]
    pub const fn importance(&self) -> f64 {
        self.importance
    }

    /// Returns the creation time.
    #[must_use]
    pub const fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}

impl fmt::Display for MemoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (importance: {})", self.content, self.importance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_importance() {
        let entry = MemoryEntry::new("Mapped initial network topology", 0.7);
        assert_eq!(
            entry.to_string(),
            "Mapped initial network topology (importance: 0.7)"
        );
    }

    #[test]
    fn ids_are_unique() {
        let a = MemoryEntry::new("same", 1.0);
        let b = MemoryEntry::new("same", 1.0);
        assert_ne!(a.id(), b.id());
    }
}
