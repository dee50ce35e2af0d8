//! Model adapters used by agents.
//!
//! [`traits`] defines the provider-neutral request and streaming contract;
//! [`gemini`] implements it against Google's `generateContent` endpoint.

#![warn(missing_docs, clippy::pedantic)]

pub mod gemini;
pub mod traits;

mod http_client;
