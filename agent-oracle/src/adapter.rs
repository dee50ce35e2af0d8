//! [`TextOracle`] backed by a [`ModelAdapter`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use agent_adapters::traits::{AdapterMetadata, InferenceRequest, ModelAdapter};
use async_trait::async_trait;
use futures::StreamExt;
use tokio::time::timeout;
use tracing::debug;

use crate::oracle::{GenerationOptions, TextOracle};
use crate::{OracleError, OracleResult};

/// Oracle that forwards prompts to a model adapter and collects the streamed reply.
///
/// Every call is bounded by a timeout; expiry surfaces as
/// [`OracleError::Timeout`], which callers treat like any other oracle failure.
#[derive(Clone)]
pub struct AdapterOracle {
    adapter: Arc<dyn ModelAdapter>,
    timeout: Option<Duration>,
}

impl fmt::Debug for AdapterOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metadata = self.adapter.metadata();
        f.debug_struct("AdapterOracle")
            .field("provider", &metadata.provider())
            .field("model", &metadata.model())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AdapterOracle {
    /// Timeout applied unless overridden.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Wraps `adapter` with the default timeout.
    #[must_use]
    pub fn new(adapter: Arc<dyn ModelAdapter>) -> Self {
        Self {
            adapter,
            timeout: Some(Self::DEFAULT_TIMEOUT),
        }
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Removes the per-call timeout; the adapter's own limits still apply.
    #[must_use]
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Returns metadata of the wrapped adapter.
    #[must_use]
    pub fn metadata(&self) -> &AdapterMetadata {
        self.adapter.metadata()
    }

    async fn run(&self, request: InferenceRequest) -> OracleResult<String> {
        let mut stream = self.adapter.infer(request).await?;
        let mut reply = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            reply.push_str(&chunk.delta);
            if chunk.done {
                break;
            }
        }

        if reply.trim().is_empty() {
            return Err(OracleError::EmptyResponse);
        }
        Ok(reply)
    }
}

#[async_trait]
impl TextOracle for AdapterOracle {
    async fn complete(
        &self,
        prompt: &str,
        options: Option<&GenerationOptions>,
    ) -> OracleResult<String> {
        let mut request = InferenceRequest::from_prompt(prompt);
        if let Some(options) = options {
            request = options.apply(request);
        }

        debug!(
            provider = self.adapter.metadata().provider(),
            model = %self.adapter.metadata().model(),
            prompt_len = prompt.len(),
            "querying oracle"
        );

        match self.timeout {
            Some(limit) => timeout(limit, self.run(request))
                .await
                .map_err(|_| OracleError::Timeout { limit })?,
            None => self.run(request).await,
        }
    }
}
