//! The agent entity.
//!
//! [`Agent`] owns an action registry and a bounded memory store and reaches
//! out to a [`TextOracle`](agent_oracle::TextOracle) for generation,
//! relevance scoring and action suggestions.

#![warn(missing_docs, clippy::pedantic)]

mod agent;
mod error;
mod oracle;

pub use agent::Agent;
pub use error::{AgentError, AgentResult};
pub use oracle::gemini_oracle;
