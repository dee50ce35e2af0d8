//! Google Gemini `generateContent` adapter.

use std::{env, fmt, time::Duration};

use async_trait::async_trait;
use futures::stream;
use hyper::body::to_bytes;
use hyper::header::{CONTENT_TYPE, RETRY_AFTER};
use hyper::{Body, Request, StatusCode, Uri};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::debug;

use crate::http_client::{HyperClient, build_https_client};
use crate::traits::{
    AdapterError, AdapterMetadata, AdapterResult, AdapterStream, InferenceChunk, InferenceRequest,
    ModelAdapter, SafetySetting,
};

/// Environment variable used when loading configuration automatically.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

/// Configuration for the Gemini adapter.
#[derive(Clone)]
pub struct GeminiConfig {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
    default_temperature: Option<f32>,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("api_key_set", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl GeminiConfig {
    /// Creates a configuration using the supplied model identifier.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(60),
            default_temperature: None,
        }
    }

    /// Loads the API key from the `GEMINI_API_KEY` environment variable.
    #[must_use]
    pub fn from_env(model: impl Into<String>) -> Self {
        let mut cfg = Self::new(model);
        cfg.api_key = env::var(GEMINI_API_KEY_ENV).ok().filter(|key| !key.is_empty());
        cfg
    }

    /// Overrides the base URL used for API calls.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        self.base_url = sanitize_base_url(base_url.as_ref())?;
        Ok(self)
    }

    /// Sets the default sampling temperature used when requests omit it.
    #[must_use]
    pub fn with_default_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = Some(temperature);
        self
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Supplies an explicit API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Returns the configured model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Gemini adapter calling the public REST API over HTTPS.
pub struct GeminiAdapter {
    client: HyperClient,
    endpoint: String,
    metadata: AdapterMetadata,
    api_key: String,
    timeout: Duration,
    default_temperature: Option<f32>,
}

impl fmt::Debug for GeminiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiAdapter")
            .field("model", &self.metadata.model())
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GeminiAdapter {
    /// Constructs a new adapter with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the API key is missing.
    pub fn new(config: GeminiConfig) -> AdapterResult<Self> {
        let api_key = config.api_key.ok_or_else(|| {
            AdapterError::configuration(format!(
                "Gemini adapter requires an API key (set {GEMINI_API_KEY_ENV})"
            ))
        })?;

        let endpoint = format!(
            "{}v1beta/models/{}:generateContent",
            config.base_url, config.model
        );

        Ok(Self {
            client: build_https_client(config.timeout),
            endpoint,
            metadata: AdapterMetadata::new("gemini", config.model),
            api_key,
            timeout: config.timeout,
            default_temperature: config.default_temperature,
        })
    }

    fn build_request(&self, request: &InferenceRequest) -> GenerateContentRequest {
        let contents = vec![Content {
            role: "user".to_owned(),
            parts: vec![Part {
                text: request.prompt().to_owned(),
            }],
        }];

        let temperature = request.temperature().or(self.default_temperature);
        let generation_config = (request.has_sampling() || temperature.is_some()).then(|| {
            GenerationConfig {
                temperature,
                max_output_tokens: request.max_output_tokens(),
                top_p: request.top_p(),
                top_k: request.top_k(),
                stop_sequences: request.stop_sequences().to_vec(),
            }
        });

        GenerateContentRequest {
            contents,
            generation_config,
            safety_settings: request.safety_settings().to_vec(),
        }
    }

    fn build_uri(&self) -> AdapterResult<Uri> {
        format!("{}?key={}", self.endpoint, self.api_key)
            .parse::<Uri>()
            .map_err(|err| AdapterError::configuration(format!("invalid Gemini endpoint: {err}")))
    }
}

#[async_trait]
impl ModelAdapter for GeminiAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn infer(&self, request: InferenceRequest) -> AdapterResult<AdapterStream> {
        let payload = self.build_request(&request);
        let body = serde_json::to_vec(&payload).map_err(|err| {
            AdapterError::invalid_request(format!("failed to encode Gemini request: {err}"))
        })?;

        let req = Request::post(self.build_uri()?)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .map_err(|err| {
                AdapterError::transport(format!("failed to build Gemini request: {err}"))
            })?;

        debug!(model = %self.metadata.model(), "sending Gemini generateContent request");

        let response = timeout(self.timeout, self.client.request(req))
            .await
            .map_err(|_| AdapterError::transport("Gemini request timed out"))?
            .map_err(|err| AdapterError::transport(format!("Gemini request failed: {err}")))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(AdapterError::RateLimited { retry_after });
        }

        let bytes = to_bytes(response.into_body()).await.map_err(|err| {
            AdapterError::transport(format!("failed to read Gemini response: {err}"))
        })?;

        if !status.is_success() {
            let reason = String::from_utf8_lossy(&bytes);
            return Err(AdapterError::response(format!(
                "Gemini returned {status}: {reason}"
            )));
        }

        let text = extract_text(&bytes)?;
        let stream = stream::once(async move { Ok(InferenceChunk::new(text, true)) });
        Ok(Box::pin(stream))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    // Absent when the candidate was blocked by a safety filter.
    content: Option<Content>,
}

/// Returns the text of the first part of the first candidate.
fn extract_text(bytes: &[u8]) -> AdapterResult<String> {
    let response: GenerateContentResponse = serde_json::from_slice(bytes)
        .map_err(|err| AdapterError::response(format!("failed to decode Gemini response: {err}")))?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or_else(|| AdapterError::response("Gemini response contained no candidate text"))
}

fn sanitize_base_url(input: &str) -> AdapterResult<String> {
    let mut base = input.trim().to_owned();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(AdapterError::configuration(
            "Gemini base URL must start with http:// or https://",
        ));
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    base.parse::<Uri>()
        .map_err(|err| AdapterError::configuration(format!("invalid Gemini base URL: {err}")))?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn adapter() -> GeminiAdapter {
        GeminiAdapter::new(GeminiConfig::new(DEFAULT_GEMINI_MODEL).with_api_key("test_key"))
            .expect("adapter")
    }

    #[test]
    fn missing_api_key_is_configuration_error() {
        let err = GeminiAdapter::new(GeminiConfig::new(DEFAULT_GEMINI_MODEL))
            .expect_err("api key required");
        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn base_url_requires_scheme() {
        let err = GeminiConfig::new(DEFAULT_GEMINI_MODEL)
            .with_base_url("generativelanguage.googleapis.com")
            .expect_err("missing scheme should error");
        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn sanitize_appends_trailing_slash() {
        let cfg = GeminiConfig::new(DEFAULT_GEMINI_MODEL)
            .with_base_url("https://example.com/gemini")
            .expect("valid URL");
        assert_eq!(cfg.base_url, "https://example.com/gemini/");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let cfg = GeminiConfig::new(DEFAULT_GEMINI_MODEL).with_api_key("secret-value");
        assert!(!format!("{cfg:?}").contains("secret-value"));
        assert!(!format!("{:?}", adapter()).contains("test_key"));
    }

    #[test]
    fn bare_prompt_omits_generation_config() {
        let payload = adapter().build_request(&InferenceRequest::from_prompt("hello"));
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({ "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }] })
        );
    }

    #[test]
    fn sampling_and_safety_are_serialized() {
        let request = InferenceRequest::from_prompt("Write a story")
            .with_temperature(0.7)
            .with_max_output_tokens(500)
            .with_top_p(0.9)
            .with_top_k(15)
            .with_stop_sequences(vec!["The End".to_owned()])
            .with_safety_settings(vec![SafetySetting::new(
                "HARM_CATEGORY_DANGEROUS_CONTENT",
                "BLOCK_ONLY_HIGH",
            )]);

        let value = serde_json::to_value(adapter().build_request(&request)).unwrap();
        let config = &value["generationConfig"];
        assert_eq!(config["maxOutputTokens"], 500);
        assert_eq!(config["topK"], 15);
        assert_eq!(config["stopSequences"], json!(["The End"]));
        assert!((config["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(
            value["safetySettings"],
            json!([{ "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_ONLY_HIGH" }])
        );
    }

    #[test]
    fn default_temperature_applies_when_request_omits_it() {
        let adapter = GeminiAdapter::new(
            GeminiConfig::new(DEFAULT_GEMINI_MODEL)
                .with_api_key("k")
                .with_default_temperature(0.2),
        )
        .unwrap();
        let payload = adapter.build_request(&InferenceRequest::from_prompt("hi"));
        assert!(payload.generation_config.is_some_and(|cfg| cfg.temperature == Some(0.2)));
    }

    #[test]
    fn extracts_first_candidate_text() {
        let body = json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "0.8" }, { "text": "ignored" }] } },
                { "content": { "role": "model", "parts": [{ "text": "second" }] } }
            ]
        });
        let text = extract_text(body.to_string().as_bytes()).unwrap();
        assert_eq!(text, "0.8");
    }

    #[test]
    fn blocked_or_empty_response_is_error() {
        for body in [json!({}), json!({ "candidates": [{ "finishReason": "SAFETY" }] })] {
            let err = extract_text(body.to_string().as_bytes()).expect_err("no text");
            assert!(matches!(err, AdapterError::Response { .. }));
        }

        let err = extract_text(b"not json").expect_err("malformed");
        assert!(matches!(err, AdapterError::Response { .. }));
    }
}
