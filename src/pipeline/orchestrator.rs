//! Retrieval → fingerprint → cache → generation sequencing

use crate::cache::{derive_key, CacheEntry, LruCache};
use crate::config::PipelineConfig;
use crate::error::{Result, VaultError};
use crate::pipeline::{
    collaborators::{Generator, Retriever},
    metrics::{Metrics, MetricsEvent, MetricsSnapshot},
    observer::PipelineObserver,
    prompt::build_prompt,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Where a response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    /// Served from the response cache
    Cache,

    /// Produced by the generation backend on a cache miss
    Generated,

    /// Pipeline-authored message after a generation failure
    System,
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseSource::Cache => write!(f, "cache"),
            ResponseSource::Generated => write!(f, "generated"),
            ResponseSource::System => write!(f, "system"),
        }
    }
}

/// Per-query processing stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStage {
    Retrieving,
    KeyDerived,
    CacheHit,
    CacheMiss,
    Generating,
    Complete,
    Failed,
}

impl fmt::Display for QueryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryStage::Retrieving => "retrieving",
            QueryStage::KeyDerived => "key_derived",
            QueryStage::CacheHit => "cache_hit",
            QueryStage::CacheMiss => "cache_miss",
            QueryStage::Generating => "generating",
            QueryStage::Complete => "complete",
            QueryStage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Result of processing one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// Text shown to the caller
    pub response: String,

    /// Origin of `response`
    pub source: ResponseSource,

    /// End-to-end latency; zero for system responses
    pub latency: Duration,

    /// Passages retrieved for this query; empty for system responses
    pub retrieved_context: Vec<String>,
}

impl QueryOutcome {
    fn system(message: &str) -> Self {
        Self {
            response: message.to_string(),
            source: ResponseSource::System,
            latency: Duration::ZERO,
            retrieved_context: Vec::new(),
        }
    }
}

/// Cache and metrics, always locked together
struct PipelineState {
    cache: LruCache,
    metrics: Metrics,
}

/// Retrieval-then-generate pipeline with a fingerprinted response cache
///
/// Each query is retrieved, fingerprinted together with its context, and
/// answered from cache when possible. Misses go to the generator and the
/// result is cached. The cache and metrics share one lock; the lock is
/// never held across a retrieval or generation call.
pub struct RagPipeline {
    config: PipelineConfig,
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn Generator>,
    state: Mutex<PipelineState>,
    observers: Arc<Vec<Arc<dyn PipelineObserver>>>,
    metrics_tx: watch::Sender<MetricsSnapshot>,
}

impl RagPipeline {
    /// Create a new builder
    pub fn builder(config: PipelineConfig) -> RagPipelineBuilder {
        RagPipelineBuilder {
            config,
            retriever: None,
            generator: None,
            observers: Vec::new(),
        }
    }

    /// Create a pipeline without observers
    pub fn new(
        config: PipelineConfig,
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn Generator>,
    ) -> Result<Self> {
        Self::builder(config)
            .retriever(retriever)
            .generator(generator)
            .build()
    }

    /// Answer a query from cache or by generation
    ///
    /// Never fails: a generation error yields a [`ResponseSource::System`]
    /// outcome carrying the configured failure message, with zero latency
    /// and no context. Empty queries are processed like any other.
    pub async fn process_query(&self, query: &str) -> QueryOutcome {
        let start = Instant::now();

        debug!(stage = %QueryStage::Retrieving, "Processing query");
        let context = self.retriever.retrieve(query).await;

        let key = derive_key(query, &context);
        debug!(stage = %QueryStage::KeyDerived, key = %key, passages = context.len());

        let hit = {
            let mut state = self.state.lock().await;
            match state.cache.get(&key).map(|entry| entry.response.clone()) {
                Some(response) => {
                    let latency = start.elapsed();
                    let size = state.cache.len();
                    let snapshot = state.metrics.record(MetricsEvent::Hit { latency }, size);
                    self.publish(snapshot);
                    Some((response, latency))
                }
                None => None,
            }
        };

        if let Some((response, latency)) = hit {
            debug!(stage = %QueryStage::CacheHit, key = %key, latency_ms = latency.as_millis() as u64);
            return QueryOutcome {
                response,
                source: ResponseSource::Cache,
                latency,
                retrieved_context: context,
            };
        }

        debug!(stage = %QueryStage::CacheMiss, key = %key);
        let generation_start = Instant::now();
        let prompt = build_prompt(query, &context, &self.config.empty_context_placeholder);

        debug!(stage = %QueryStage::Generating, prompt_len = prompt.len());
        match self.generator.generate(&prompt).await {
            Ok(text) => {
                let response = if text.trim().is_empty() {
                    debug!("Generator returned blank text, using fallback response");
                    self.config.fallback_response.clone()
                } else {
                    text
                };

                let latency = {
                    let mut state = self.state.lock().await;
                    let entry = CacheEntry::new(key.clone(), response.clone(), context.clone());
                    let evicted = state.cache.put(entry);
                    let generation_latency = generation_start.elapsed();
                    let latency = start.elapsed();
                    let size = state.cache.len();
                    let snapshot = state.metrics.record(
                        MetricsEvent::Miss {
                            generation_latency,
                            evictions: u64::from(evicted.is_some()),
                        },
                        size,
                    );
                    self.publish(snapshot);
                    latency
                };

                debug!(stage = %QueryStage::Complete, key = %key, latency_ms = latency.as_millis() as u64);
                QueryOutcome {
                    response,
                    source: ResponseSource::Generated,
                    latency,
                    retrieved_context: context,
                }
            }
            Err(e) => {
                warn!("RAG pipeline generation failed: {}", e);
                {
                    let mut state = self.state.lock().await;
                    let size = state.cache.len();
                    let snapshot = state.metrics.record(MetricsEvent::Failed, size);
                    self.publish(snapshot);
                }

                debug!(stage = %QueryStage::Failed, key = %key);
                QueryOutcome::system(&self.config.failure_message)
            }
        }
    }

    /// Clear the cache and zero all metrics
    ///
    /// No eviction notifications fire; observers receive the zeroed snapshot.
    pub async fn reset(&self) {
        {
            let mut state = self.state.lock().await;
            state.cache.clear();
            let snapshot = state.metrics.reset();
            self.publish(snapshot);
        }

        info!("Pipeline reset");
    }

    /// Current metrics
    pub async fn metrics(&self) -> MetricsSnapshot {
        let state = self.state.lock().await;
        state.metrics.snapshot()
    }

    /// Watch channel that always holds the latest metrics snapshot
    pub fn subscribe(&self) -> watch::Receiver<MetricsSnapshot> {
        self.metrics_tx.subscribe()
    }

    /// Number of cached responses
    pub async fn cache_len(&self) -> usize {
        let state = self.state.lock().await;
        state.cache.len()
    }

    /// Cached entry for a key, without touching recency order
    pub async fn peek_entry(&self, key: &str) -> Option<CacheEntry> {
        let state = self.state.lock().await;
        state.cache.peek(key).cloned()
    }

    /// Cached keys, least recently used first
    pub async fn cached_keys(&self) -> Vec<String> {
        let state = self.state.lock().await;
        state.cache.keys_by_recency()
    }

    /// Cache capacity
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Notify observers and subscribers; callers hold the state lock so
    /// snapshots go out in the order they were recorded
    fn publish(&self, snapshot: MetricsSnapshot) {
        for observer in self.observers.iter() {
            observer.on_metrics(&snapshot);
        }
        self.metrics_tx.send_replace(snapshot);
    }
}

impl fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RagPipeline")
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`RagPipeline`]
pub struct RagPipelineBuilder {
    config: PipelineConfig,
    retriever: Option<Arc<dyn Retriever>>,
    generator: Option<Arc<dyn Generator>>,
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl RagPipelineBuilder {
    /// Set the retrieval backend
    pub fn retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Set the generation backend
    pub fn generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Add an observer for metrics and eviction notifications
    pub fn observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Validate the configuration and build the pipeline
    pub fn build(self) -> Result<RagPipeline> {
        self.config.validate()?;

        let retriever = self
            .retriever
            .ok_or_else(|| VaultError::ConfigError("retriever is required".to_string()))?;
        let generator = self
            .generator
            .ok_or_else(|| VaultError::ConfigError("generator is required".to_string()))?;

        let observers = Arc::new(self.observers);
        let listeners = observers.clone();
        let cache = LruCache::new(self.config.capacity)?.with_eviction_listener(move |entry| {
            for observer in listeners.iter() {
                observer.on_eviction(entry);
            }
        });

        let metrics = Metrics::new(self.config.capacity);
        let (metrics_tx, _) = watch::channel(metrics.snapshot());

        info!(
            "Initializing RAG pipeline (capacity {}, {} observers)",
            self.config.capacity,
            observers.len()
        );

        Ok(RagPipeline {
            config: self.config,
            retriever,
            generator,
            state: Mutex::new(PipelineState { cache, metrics }),
            observers,
            metrics_tx,
        })
    }
}
