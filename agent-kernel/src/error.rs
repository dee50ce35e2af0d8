use agent_actions::ActionError;
use agent_oracle::OracleError;
use thiserror::Error;

/// Errors surfaced by [`Agent`](crate::Agent) operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Action lookup or execution failed.
    #[error(transparent)]
    Action(#[from] ActionError),
    /// The oracle could not produce a result.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Convenience alias for agent results.
pub type AgentResult<T> = Result<T, AgentError>;
