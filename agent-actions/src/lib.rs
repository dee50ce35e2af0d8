//! Action registration and invocation.
//!
//! Agents register zero-argument callables under unique names, attach a
//! priority weight to each name and invoke them on demand. Priorities are
//! bookkeeping for external decision policies; invocation ignores them.

#![warn(missing_docs, clippy::pedantic)]

pub mod registry;

pub use registry::{Action, ActionError, ActionRegistry, ActionResult, DEFAULT_PRIORITY};
