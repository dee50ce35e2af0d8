//! Loading configuration from JSON and the environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::{AgentConfig, ConfigError, ConfigResult};

/// Overrides [`AgentConfig::name`].
pub const NAME_ENV: &str = "RECALL_AGENT_NAME";
/// Overrides `memory.capacity`.
pub const MEMORY_CAPACITY_ENV: &str = "RECALL_AGENT_MEMORY_CAPACITY";
/// Overrides `recall.max_results`.
pub const MAX_RESULTS_ENV: &str = "RECALL_AGENT_MAX_RESULTS";
/// Overrides `oracle.model`.
pub const MODEL_ENV: &str = "GEMINI_MODEL";
/// Supplies `oracle.api_key`.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

impl AgentConfig {
    /// Parses a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::InvalidValue`] when validation fails.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise the
    /// errors of [`AgentConfig::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded agent config");
        Self::from_json_str(&text)
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric override does not parse.
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides resolved through `lookup`; empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric override does not parse.
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(name) = lookup(NAME_ENV) {
            self.name = name;
        }
        if let Some(raw) = lookup(MEMORY_CAPACITY_ENV) {
            self.memory.capacity = parse_number(MEMORY_CAPACITY_ENV, &raw)?;
        }
        if let Some(raw) = lookup(MAX_RESULTS_ENV) {
            self.recall.max_results = parse_number(MAX_RESULTS_ENV, &raw)?;
        }
        if let Some(model) = lookup(MODEL_ENV) {
            self.oracle.model = model;
        }
        if let Some(key) = lookup(API_KEY_ENV) {
            self.oracle.api_key = Some(key);
        }

        self.validate()?;
        Ok(self)
    }

    /// Checks field values that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty name or model, or a
    /// zero timeout.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid("name", "must not be empty"));
        }
        if self.oracle.model.trim().is_empty() {
            return Err(ConfigError::invalid("oracle.model", "must not be empty"));
        }
        if self.oracle.timeout_secs == 0 {
            return Err(ConfigError::invalid("oracle.timeout_secs", "must be positive"));
        }
        if self.oracle.http_timeout_secs == 0 {
            return Err(ConfigError::invalid("oracle.http_timeout_secs", "must be positive"));
        }
        Ok(())
    }
}

fn parse_number<T>(key: &str, raw: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|err: T::Err| ConfigError::invalid(key, format!("{raw:?}: {err}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_fill_every_section() {
        let config = AgentConfig::default();
        assert_eq!(config.memory.capacity, 100);
        assert_eq!(config.recall.max_results, 5);
        assert_eq!(config.oracle.model, "gemini-1.5-flash");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            AgentConfig::from_json_str(r#"{ "name": "GeminiExplorer", "memory": { "capacity": 10 } }"#)
                .unwrap();
        assert_eq!(config.name, "GeminiExplorer");
        assert_eq!(config.memory.capacity, 10);
        assert_eq!(config.recall.max_results, 5);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = AgentConfig::from_json_str(r#"{ "memroy": {} }"#).expect_err("typo");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let err = AgentConfig::from_json_str(r#"{ "oracle": { "timeout_secs": 0 } }"#)
            .expect_err("zero timeout");
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "oracle.timeout_secs"));
    }

    #[test]
    fn overrides_apply_and_skip_blanks() {
        let config = AgentConfig::default()
            .with_overrides(env(&[
                (NAME_ENV, "scout"),
                (MEMORY_CAPACITY_ENV, " 7 "),
                (MODEL_ENV, ""),
                (API_KEY_ENV, "k-123"),
            ]))
            .unwrap();

        assert_eq!(config.name, "scout");
        assert_eq!(config.memory.capacity, 7);
        assert_eq!(config.oracle.model, "gemini-1.5-flash");
        assert_eq!(config.oracle.api_key.as_deref(), Some("k-123"));
    }

    #[test]
    fn non_numeric_override_is_invalid() {
        let err = AgentConfig::default()
            .with_overrides(env(&[(MAX_RESULTS_ENV, "many")]))
            .expect_err("not a number");
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == MAX_RESULTS_ENV));
    }

    #[test]
    fn api_key_is_never_serialized_or_debugged() {
        let mut config = AgentConfig::default();
        config.oracle.api_key = Some("super-secret".to_owned());

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "recall": {{ "max_results": 3 }} }}"#).unwrap();

        let config = AgentConfig::from_file(file.path()).unwrap();
        assert_eq!(config.recall.max_results, 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = AgentConfig::from_file(&path).expect_err("file absent");
        assert!(matches!(err, ConfigError::Io { path: reported, .. } if reported == path));
    }
}
