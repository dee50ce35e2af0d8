use std::sync::Arc;

use agent_adapters::gemini::{GeminiAdapter, GeminiConfig};
use agent_config::OracleSection;
use agent_oracle::{AdapterOracle, OracleError};
use tracing::info;

use crate::AgentResult;

/// Builds a Gemini-backed oracle from configuration.
///
/// # Errors
///
/// Returns [`AgentError::Oracle`](crate::AgentError::Oracle) when the API key
/// is missing or the base URL is malformed.
pub fn gemini_oracle(section: &OracleSection) -> AgentResult<AdapterOracle> {
    let mut config = GeminiConfig::new(section.model.clone()).with_timeout(section.http_timeout());
    if let Some(key) = &section.api_key {
        config = config.with_api_key(key.clone());
    }
    if let Some(base_url) = &section.base_url {
        config = config.with_base_url(base_url).map_err(OracleError::from)?;
    }

    let adapter = GeminiAdapter::new(config).map_err(OracleError::from)?;
    info!(model = %section.model, timeout_secs = section.timeout_secs, "gemini oracle ready");
    Ok(AdapterOracle::new(Arc::new(adapter)).with_timeout(section.timeout()))
}
