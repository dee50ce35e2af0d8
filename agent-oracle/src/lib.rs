//! Text oracle used by agents for generation, relevance scoring and action
//! suggestions.
//!
//! [`TextOracle`] is the injectable capability. [`AdapterOracle`] implements it
//! over any [`agent_adapters::traits::ModelAdapter`], and [`OracleRelevance`]
//! lets a memory store rank entries through it.

#![warn(missing_docs, clippy::pedantic)]

mod adapter;
mod error;
mod oracle;
pub mod prompts;
mod scorer;

pub use adapter::AdapterOracle;
pub use error::{OracleError, OracleResult};
pub use oracle::{GenerationOptions, TextOracle};
pub use scorer::OracleRelevance;
