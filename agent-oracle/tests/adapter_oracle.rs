use std::sync::{Arc, Mutex};
use std::time::Duration;

use agent_adapters::traits::{
    AdapterError, AdapterMetadata, AdapterResult, AdapterStream, InferenceChunk, InferenceRequest,
    ModelAdapter,
};
use agent_memory::{MemoryStore, RelevanceScorer};
use agent_oracle::{AdapterOracle, GenerationOptions, OracleError, OracleRelevance, TextOracle};
use async_trait::async_trait;
use futures::stream;

struct StaticAdapter {
    metadata: AdapterMetadata,
    chunks: Vec<&'static str>,
    seen: Mutex<Vec<InferenceRequest>>,
}

impl StaticAdapter {
    fn new(chunks: Vec<&'static str>) -> Self {
        Self {
            metadata: AdapterMetadata::new("test", "static"),
            chunks,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ModelAdapter for StaticAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn infer(&self, request: InferenceRequest) -> AdapterResult<AdapterStream> {
        self.seen.lock().unwrap().push(request);
        let last = self.chunks.len().saturating_sub(1);
        let chunks: Vec<_> = self
            .chunks
            .iter()
            .enumerate()
            .map(|(index, delta)| Ok(InferenceChunk::new(*delta, index == last)))
            .collect();
        Ok(Box::pin(stream::iter(chunks)))
    }
}

struct UnreachableAdapter {
    metadata: AdapterMetadata,
}

#[async_trait]
impl ModelAdapter for UnreachableAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn infer(&self, _request: InferenceRequest) -> AdapterResult<AdapterStream> {
        Err(AdapterError::transport("connection refused"))
    }
}

struct SlowAdapter {
    metadata: AdapterMetadata,
}

#[async_trait]
impl ModelAdapter for SlowAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn infer(&self, _request: InferenceRequest) -> AdapterResult<AdapterStream> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Box::pin(stream::once(async { Ok(InferenceChunk::new("late", true)) })))
    }
}

#[tokio::test]
async fn collects_streamed_chunks() {
    let oracle = AdapterOracle::new(Arc::new(StaticAdapter::new(vec!["Explore", ", Collect"])));
    let reply = oracle.generate("hello").await.unwrap();
    assert_eq!(reply, "Explore, Collect");
}

#[tokio::test]
async fn plain_generate_sends_no_sampling() {
    let adapter = Arc::new(StaticAdapter::new(vec!["ok"]));
    let oracle = AdapterOracle::new(Arc::clone(&adapter) as Arc<dyn ModelAdapter>);
    oracle.generate("strategy?").await.unwrap();

    let seen = adapter.seen.lock().unwrap();
    assert_eq!(seen[0].prompt(), "strategy?");
    assert!(!seen[0].has_sampling());
}

#[tokio::test]
async fn options_are_forwarded() {
    let adapter = Arc::new(StaticAdapter::new(vec!["Once upon a time"]));
    let oracle = AdapterOracle::new(Arc::clone(&adapter) as Arc<dyn ModelAdapter>);
    let options = GenerationOptions::default()
        .with_temperature(0.7)
        .with_max_output_tokens(500)
        .with_top_p(0.9)
        .with_top_k(15)
        .with_stop_sequence("The End")
        .with_safety_setting("HARM_CATEGORY_DANGEROUS_CONTENT", "BLOCK_ONLY_HIGH");

    oracle.complete("story", Some(&options)).await.unwrap();

    let seen = adapter.seen.lock().unwrap();
    assert_eq!(seen[0].max_output_tokens(), Some(500));
    assert_eq!(seen[0].top_k(), Some(15));
    assert_eq!(seen[0].stop_sequences(), ["The End".to_owned()]);
    assert_eq!(seen[0].safety_settings()[0].threshold, "BLOCK_ONLY_HIGH");
}

#[tokio::test]
async fn adapter_failure_is_oracle_error() {
    let oracle = AdapterOracle::new(Arc::new(UnreachableAdapter {
        metadata: AdapterMetadata::new("test", "down"),
    }));
    let err = oracle.generate("ping").await.expect_err("adapter down");
    assert!(matches!(err, OracleError::Adapter(AdapterError::Transport { .. })));
}

#[tokio::test]
async fn blank_reply_is_empty_response() {
    let oracle = AdapterOracle::new(Arc::new(StaticAdapter::new(vec!["  ", "\n"])));
    let err = oracle.generate("ping").await.expect_err("blank reply");
    assert!(matches!(err, OracleError::EmptyResponse));
}

#[tokio::test]
async fn slow_adapter_times_out() {
    let oracle = AdapterOracle::new(Arc::new(SlowAdapter {
        metadata: AdapterMetadata::new("test", "slow"),
    }))
    .with_timeout(Duration::from_millis(20));

    let err = oracle.generate("ping").await.expect_err("should time out");
    assert!(matches!(err, OracleError::Timeout { limit } if limit == Duration::from_millis(20)));
}

#[tokio::test]
async fn oracle_relevance_maps_failures_to_scoring_errors() {
    let oracle = AdapterOracle::new(Arc::new(StaticAdapter::new(vec!["not a number"])));
    let scorer = OracleRelevance::new(&oracle);
    assert!(scorer.relevance("memory", "query").await.is_err());
}

#[tokio::test]
async fn timed_out_oracle_degrades_recall_to_importance() {
    let oracle = AdapterOracle::new(Arc::new(SlowAdapter {
        metadata: AdapterMetadata::new("test", "slow"),
    }))
    .with_timeout(Duration::from_millis(10));

    let mut store = MemoryStore::with_capacity(5);
    store.add("minor detail", 0.1);
    store.add("critical finding", 0.9);

    let ranked = store
        .recall_ranked("findings", 2, &OracleRelevance::new(&oracle))
        .await;
    assert_eq!(ranked[0].content, "critical finding");
    assert!(ranked.iter().all(|hit| hit.fallback));
    assert!((ranked[1].score - 0.05).abs() < 1e-12);
}
