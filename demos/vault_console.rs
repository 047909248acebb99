//! Vault Console Demo
//!
//! Runs a scripted conversation through the pipeline and prints each
//! outcome followed by the final metrics snapshot.
//!
//! Usage:
//!   cargo run --example vault_console
//!
//! Environment variables:
//!   VAULT_CACHE_CAPACITY - cache capacity (default: 8)
//!   RUST_LOG             - log filter (default: info)

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vault_rag::pipeline::{GenerationError, Generator};
use vault_rag::{Document, DocumentVault, PipelineConfig, RagPipeline, TracingObserver};

/// Stands in for a hosted model: answers after a short delay
struct EchoGenerator {
    delay: Duration,
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        tokio::time::sleep(self.delay).await;
        let question = prompt
            .lines()
            .find_map(|line| line.strip_prefix("User Question: "))
            .ok_or_else(|| GenerationError::Other("prompt has no question".to_string()))?;
        Ok(format!("Here is what the vault says about \"{}\".", question))
    }
}

fn vault_documents() -> Vec<Document> {
    vec![
        Document::new(
            "1",
            "Cache Strategy",
            "LRU eviction is better than TTL for RAG pipelines because it keeps high-frequency context regardless of age.",
        ),
        Document::new(
            "2",
            "System Architecture",
            "The vault derives cache keys from a hash of the query combined with the retrieved context.",
        ),
        Document::new(
            "3",
            "Model Selection",
            "Long-context models handle complex reasoning over many retrieved passages.",
        ),
        Document::new(
            "4",
            "Retrieval Quality",
            "Retrieval quality is measured by faithfulness and relevance; semantic chunking keeps context intact.",
        ),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = PipelineConfig::from_env()?;
    info!("=== Vault Console (capacity {}) ===", config.capacity);

    let pipeline = RagPipeline::builder(config)
        .retriever(Arc::new(DocumentVault::new(vault_documents())))
        .generator(Arc::new(EchoGenerator {
            delay: Duration::from_millis(250),
        }))
        .observer(Arc::new(TracingObserver))
        .build()?;

    let script = [
        "What is LRU?",
        "How are cache keys derived?",
        "What is LRU?",
        "How is retrieval quality measured?",
        "Tell me about bananas",
        "How are cache keys derived?",
    ];

    for query in script {
        let outcome = pipeline.process_query(query).await;
        info!(
            "[{}] {:>6.1}ms  {}  ->  {}",
            outcome.source,
            outcome.latency.as_secs_f64() * 1000.0,
            query,
            outcome.response
        );
        for passage in &outcome.retrieved_context {
            info!("    context: {}", passage);
        }
    }

    let metrics = pipeline.metrics().await;
    info!("Hit ratio: {:.1}%", metrics.hit_ratio() * 100.0);
    info!("Avg cache latency: {:?}", metrics.avg_cache_latency());
    info!("Avg generation latency: {:?}", metrics.avg_llm_latency());
    println!("{}", metrics.to_json()?);

    Ok(())
}
