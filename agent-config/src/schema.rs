//! Strongly typed configuration schema.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level agent configuration. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Agent display name.
    pub name: String,
    /// Memory store settings.
    pub memory: MemorySection,
    /// Recall settings.
    pub recall: RecallSection,
    /// Oracle connection settings.
    pub oracle: OracleSection,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "recall-agent".to_owned(),
            memory: MemorySection::default(),
            recall: RecallSection::default(),
            oracle: OracleSection::default(),
        }
    }
}

/// Memory store settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemorySection {
    /// Maximum number of memories retained; zero disables storage.
    pub capacity: usize,
}

impl Default for MemorySection {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

/// Recall settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecallSection {
    /// Results returned when the caller does not ask for a specific count.
    pub max_results: usize,
}

impl Default for RecallSection {
    fn default() -> Self {
        Self { max_results: 5 }
    }
}

/// Oracle connection settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OracleSection {
    /// Gemini model identifier.
    pub model: String,
    /// Alternative API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Upper bound for a whole oracle call, in seconds.
    pub timeout_secs: u64,
    /// Upper bound for one HTTP round-trip, in seconds.
    pub http_timeout_secs: u64,
    /// API key. Never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for OracleSection {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_owned(),
            base_url: None,
            timeout_secs: 30,
            http_timeout_secs: 60,
            api_key: None,
        }
    }
}

impl OracleSection {
    /// Returns the whole-call timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the HTTP round-trip timeout.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl fmt::Debug for OracleSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleSection")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("api_key_set", &self.api_key.is_some())
            .finish()
    }
}
