//! # Pipeline Orchestrator
//!
//! Sequences retrieval, key derivation, cache lookup and (on a miss)
//! generation for each query, and keeps aggregate metrics.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use vault_rag::pipeline::{GenerationError, Generator, RagPipeline, ResponseSource};
//! use vault_rag::{Document, DocumentVault, PipelineConfig};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Generator for Echo {
//!     async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
//!         Ok(format!("{} chars of prompt", prompt.len()))
//!     }
//! }
//!
//! # async fn example() -> vault_rag::Result<()> {
//! let vault = DocumentVault::new(vec![Document::new("1", "Cache Strategy", "LRU eviction keeps hot context.")]);
//! let pipeline = RagPipeline::new(PipelineConfig::default(), Arc::new(vault), Arc::new(Echo))?;
//!
//! let first = pipeline.process_query("How does LRU eviction work?").await;
//! assert_eq!(first.source, ResponseSource::Generated);
//!
//! let second = pipeline.process_query("How does LRU eviction work?").await;
//! assert_eq!(second.source, ResponseSource::Cache);
//! # Ok(())
//! # }
//! # tokio_test::block_on(example()).unwrap();
//! ```

pub mod collaborators;
pub mod metrics;
pub mod observer;
pub mod orchestrator;
pub mod prompt;

pub use collaborators::{GenerationError, Generator, Retriever};
pub use metrics::{Metrics, MetricsEvent, MetricsSnapshot};
pub use observer::{PipelineObserver, TracingObserver};
pub use orchestrator::{QueryOutcome, QueryStage, RagPipeline, RagPipelineBuilder, ResponseSource};
pub use prompt::build_prompt;
