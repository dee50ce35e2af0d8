//! The text oracle capability and its generation options.

use agent_adapters::traits::{InferenceRequest, SafetySetting};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::prompts::{parse_relevance, parse_suggestions, relevance_prompt, suggestion_prompt};
use crate::{OracleError, OracleResult};

/// Sampling and safety options for a single generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
    /// Nucleus sampling probability mass.
    pub top_p: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Sequences that end generation.
    pub stop_sequences: Vec<String>,
    /// Content-filter thresholds, at most one per category.
    pub safety_settings: Vec<SafetySetting>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            max_output_tokens: 800,
            top_p: 0.8,
            top_k: 10,
            stop_sequences: Vec::new(),
            safety_settings: Vec::new(),
        }
    }
}

impl GenerationOptions {
    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the output token budget.
    #[must_use]
    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    /// Sets top-p.
    #[must_use]
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    /// Sets top-k.
    #[must_use]
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    /// Adds a stop sequence.
    #[must_use]
    pub fn with_stop_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.stop_sequences.push(sequence.into());
        self
    }

    /// Sets the threshold for `category`, replacing an earlier one.
    #[must_use]
    pub fn with_safety_setting(
        mut self,
        category: impl Into<String>,
        threshold: impl Into<String>,
    ) -> Self {
        let setting = SafetySetting::new(category, threshold);
        match self
            .safety_settings
            .iter_mut()
            .find(|existing| existing.category == setting.category)
        {
            Some(existing) => existing.threshold = setting.threshold,
            None => self.safety_settings.push(setting),
        }
        self
    }

    pub(crate) fn apply(&self, request: InferenceRequest) -> InferenceRequest {
        request
            .with_temperature(self.temperature)
            .with_max_output_tokens(self.max_output_tokens)
            .with_top_p(self.top_p)
            .with_top_k(self.top_k)
            .with_stop_sequences(self.stop_sequences.clone())
            .with_safety_settings(self.safety_settings.clone())
    }
}

/// External text-generation capability consumed by agents.
///
/// Only [`TextOracle::complete`] is required; the other operations are built
/// on top of it and may be overridden by implementations with a native
/// equivalent.
#[async_trait]
pub trait TextOracle: Send + Sync {
    /// Generates free text for `prompt`. `None` leaves sampling to the provider.
    async fn complete(
        &self,
        prompt: &str,
        options: Option<&GenerationOptions>,
    ) -> OracleResult<String>;

    /// Generates free text for `prompt` with provider defaults.
    async fn generate(&self, prompt: &str) -> OracleResult<String> {
        self.complete(prompt, None).await
    }

    /// Asks for the relevance of `content` to `query`, in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::UnparseableScore`] when the reply does not start
    /// with a number, or the failure of the underlying generation.
    async fn score_relevance(&self, content: &str, query: &str) -> OracleResult<f64> {
        let reply = self.generate(&relevance_prompt(content, query)).await?;
        parse_relevance(&reply).ok_or(OracleError::UnparseableScore { reply })
    }

    /// Asks for candidate actions fitting `context`.
    async fn suggest_actions(&self, context: &str) -> OracleResult<Vec<String>> {
        let reply = self.generate(&suggestion_prompt(context)).await?;
        Ok(parse_suggestions(&reply))
    }
}
