//! # Vault RAG (vault-rag)
//!
//! A retrieval-then-generate pipeline fronted by a fixed-capacity LRU
//! response cache.
//!
//! ## Features
//!
//! - Cache keys fingerprint the query together with its retrieved context
//! - O(1) LRU cache with synchronous eviction notifications
//! - Async-first collaborator contracts for retrieval and generation
//! - Generation failures recovered locally as system responses
//! - Aggregate metrics published to observers and a watch channel
//!
//! ## Processing a Query
//!
//! Every query is retrieved first, then fingerprinted with its context. A
//! matching cache entry is returned directly; otherwise the generator is
//! called and its answer cached.
//!
//! ```no_run
//! use std::sync::Arc;
//! use vault_rag::{Document, DocumentVault, PipelineConfig, RagPipeline};
//! # use vault_rag::pipeline::{GenerationError, Generator};
//! # struct MyGenerator;
//! # #[async_trait::async_trait]
//! # impl Generator for MyGenerator {
//! #     async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
//! #         Ok(String::new())
//! #     }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let vault = DocumentVault::new(vec![Document::new(
//!         "1",
//!         "Cache Strategy",
//!         "LRU eviction is better than TTL for RAG pipelines.",
//!     )]);
//!
//!     let pipeline = RagPipeline::new(
//!         PipelineConfig::from_env()?,
//!         Arc::new(vault),
//!         Arc::new(MyGenerator),
//!     )?;
//!
//!     let outcome = pipeline.process_query("Why LRU over TTL?").await;
//!     println!("[{}] {} ({:?})", outcome.source, outcome.response, outcome.latency);
//!     println!("{}", pipeline.metrics().await);
//!     Ok(())
//! }
//! ```
//!
//! ## Observing the Pipeline
//!
//! Observers receive a metrics snapshot after every query and a callback
//! for every capacity eviction:
//!
//! ```no_run
//! use std::sync::Arc;
//! use vault_rag::{PipelineConfig, RagPipeline, TracingObserver};
//! # use vault_rag::pipeline::{Generator, Retriever};
//! # fn example(retriever: Arc<dyn Retriever>, generator: Arc<dyn Generator>) -> vault_rag::Result<()> {
//!
//! let pipeline = RagPipeline::builder(PipelineConfig::with_capacity(16))
//!     .retriever(retriever)
//!     .generator(generator)
//!     .observer(Arc::new(TracingObserver))
//!     .build()?;
//!
//! let updates = pipeline.subscribe();
//! println!("{}", *updates.borrow());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod retrieval;

// Re-export main types for convenience
pub use cache::{derive_key, CacheEntry, CacheKey, LruCache};
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::{Result, VaultError};
pub use pipeline::{
    GenerationError, Generator, MetricsSnapshot, PipelineObserver, QueryOutcome, RagPipeline,
    ResponseSource, Retriever, TracingObserver,
};
pub use retrieval::{Document, DocumentVault};
