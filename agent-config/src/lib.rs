//! Configuration management for agents.
//!
//! [`AgentConfig`] is plain serde data. Load it from JSON with
//! [`AgentConfig::from_file`] or [`AgentConfig::from_json_str`], then layer
//! environment variables on top with [`AgentConfig::with_env_overrides`].

#![warn(missing_docs, clippy::pedantic)]

mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use schema::{AgentConfig, MemorySection, OracleSection, RecallSection};
