//! Agent composition.

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use agent_actions::{Action, ActionError, ActionRegistry};
use agent_config::AgentConfig;
use agent_memory::{AddOutcome, MemoryConfig, MemoryEntry, MemoryStore, RankedMemory};
use agent_oracle::{GenerationOptions, OracleRelevance, TextOracle};
use tracing::{debug, info, warn};

use crate::AgentResult;

/// A named agent with prioritized actions, bounded memory and an oracle.
///
/// The agent owns its registry and store exclusively. Oracle calls are the
/// only suspension points; every mutation completes synchronously.
pub struct Agent {
    name: String,
    actions: ActionRegistry,
    memory: MemoryStore,
    oracle: Arc<dyn TextOracle>,
    recall_limit: usize,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("actions", &self.actions)
            .field("memories", &self.memory.len())
            .field("capacity", &self.memory.capacity())
            .field("recall_limit", &self.recall_limit)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Recall limit used by [`Agent::recall`] unless configured otherwise.
    pub const DEFAULT_RECALL_LIMIT: usize = 5;

    /// Creates an agent with an empty registry and store.
    #[must_use]
    pub fn new(name: impl Into<String>, memory: MemoryConfig, oracle: Arc<dyn TextOracle>) -> Self {
        Self {
            name: name.into(),
            actions: ActionRegistry::new(),
            memory: MemoryStore::new(memory),
            oracle,
            recall_limit: Self::DEFAULT_RECALL_LIMIT,
        }
    }

    /// Creates an agent from its configuration; the oracle is injected.
    #[must_use]
    pub fn from_config(config: &AgentConfig, oracle: Arc<dyn TextOracle>) -> Self {
        Self::new(
            config.name.clone(),
            MemoryConfig::new(config.memory.capacity),
            oracle,
        )
        .with_recall_limit(config.recall.max_results)
    }

    /// Sets the number of results returned by [`Agent::recall`].
    #[must_use]
    pub fn with_recall_limit(mut self, limit: usize) -> Self {
        self.recall_limit = limit;
        self
    }

    /// Returns the agent name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the default recall limit.
    #[must_use]
    pub const fn recall_limit(&self) -> usize {
        self.recall_limit
    }

    /// Returns the action registry.
    #[must_use]
    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// Registers `action` under `name`; an existing priority is kept.
    pub fn register_action<A>(&mut self, name: impl Into<String>, action: A)
    where
        A: Action + 'static,
    {
        self.actions.register(name, action);
    }

    /// Sets the priority of `name`, registered or not.
    pub fn update_action_priority(&mut self, name: impl Into<String>, priority: f64) {
        self.actions.set_priority(name, priority);
    }

    /// Returns the priority recorded for `name`.
    #[must_use]
    pub fn action_priority(&self, name: &str) -> Option<f64> {
        self.actions.priority(name)
    }

    /// Runs the action registered under `name` once.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Action`](crate::AgentError::Action) when `name`
    /// is not registered.
    pub fn execute_action(&self, name: &str) -> AgentResult<()> {
        match self.actions.execute(name) {
            Ok(()) => {
                info!(agent = %self.name, action = name, "executed action");
                Ok(())
            }
            Err(err @ ActionError::NotFound { .. }) => {
                warn!(agent = %self.name, action = name, "action not found");
                Err(err.into())
            }
        }
    }

    /// Sends `prompt` to the oracle with provider defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Oracle`](crate::AgentError::Oracle) when generation fails.
    pub async fn query_oracle(&self, prompt: &str) -> AgentResult<String> {
        Ok(self.oracle.generate(prompt).await?)
    }

    /// Sends `prompt` to the oracle with explicit sampling and safety options.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Oracle`](crate::AgentError::Oracle) when generation fails.
    pub async fn generate_content_with_config(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> AgentResult<String> {
        Ok(self.oracle.complete(prompt, Some(options)).await?)
    }

    /// Asks the oracle for actions suited to `context`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Oracle`](crate::AgentError::Oracle) when generation fails.
    pub async fn generate_possible_actions(&self, context: &str) -> AgentResult<Vec<String>> {
        let actions = self.oracle.suggest_actions(context).await?;
        debug!(agent = %self.name, suggestions = actions.len(), "oracle suggested actions");
        Ok(actions)
    }

    /// Remembers `content` now.
    pub fn add_memory(&mut self, content: impl Into<String>, importance: f64) -> AddOutcome {
        self.memory.add(content, importance)
    }

    /// Remembers `content` with an explicit creation time.
    pub fn add_memory_at(
        &mut self,
        content: impl Into<String>,
        importance: f64,
        timestamp: SystemTime,
    ) -> AddOutcome {
        self.memory
            .add_entry(MemoryEntry::with_timestamp(content, importance, timestamp))
    }

    /// Returns up to `max_results` memory contents ranked against `query`.
    ///
    /// Issues one oracle call per stored memory.
    pub async fn recall_memories(&self, query: &str, max_results: usize) -> Vec<String> {
        self.memory
            .recall(query, max_results, &OracleRelevance::new(self.oracle.as_ref()))
            .await
    }

    /// Like [`Agent::recall_memories`] with the configured recall limit.
    pub async fn recall(&self, query: &str) -> Vec<String> {
        self.recall_memories(query, self.recall_limit).await
    }

    /// Returns ranked recall hits with their scores.
    pub async fn recall_ranked(&self, query: &str, max_results: usize) -> Vec<RankedMemory> {
        self.memory
            .recall_ranked(query, max_results, &OracleRelevance::new(self.oracle.as_ref()))
            .await
    }

    /// Drops the `count` oldest memories and returns how many were removed.
    pub fn clear_oldest_memories(&mut self, count: usize) -> usize {
        self.memory.clear_oldest(count)
    }

    /// Returns the number of stored memories.
    #[must_use]
    pub fn memory_count(&self) -> usize {
        self.memory.len()
    }

    /// Returns the stored memories in store order.
    #[must_use]
    pub fn memories(&self) -> &[MemoryEntry] {
        self.memory.entries()
    }

    /// Emits one `info` event per stored memory.
    pub fn log_memories(&self) {
        info!(agent = %self.name, count = self.memory.len(), "memories");
        for entry in self.memory.entries() {
            info!(
                agent = %self.name,
                id = %entry.id(),
                memory = %entry,
                "memory"
            );
        }
    }
}
