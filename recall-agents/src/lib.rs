//! Facade over the recall agent crates.
//!
//! Each component sits behind a cargo feature of the same name; all are on by
//! default. Enabling `kernel` pulls in the crates the [`Agent`] is built from.

#![warn(missing_docs, clippy::pedantic)]

/// The agent entity (enabled by `kernel` feature).
#[cfg(feature = "kernel")]
pub use agent_kernel as kernel;

#[cfg(feature = "kernel")]
pub use agent_kernel::{Agent, AgentError, AgentResult};

/// Bounded memory store (enabled by `memory` feature).
#[cfg(feature = "memory")]
pub use agent_memory as memory;

/// Prioritized action registry (enabled by `actions` feature).
#[cfg(feature = "actions")]
pub use agent_actions as actions;

/// Model adapters, including Gemini (enabled by `adapters` feature).
#[cfg(feature = "adapters")]
pub use agent_adapters as adapters;

/// Text oracle capability (enabled by `oracle` feature).
#[cfg(feature = "oracle")]
pub use agent_oracle as oracle;

/// Configuration loading (enabled by `config` feature).
#[cfg(feature = "config")]
pub use agent_config as config;

/// Tracing setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use agent_telemetry as telemetry;
