//! Contracts for the external retrieval and generation backends

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Fetches supporting passages for a query.
///
/// Implementations must not cache or deduplicate; the pipeline owns all
/// caching. A backend failure is reported as an empty context rather than
/// an error.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Passages relevant to `query`, in ranking order (possibly empty)
    async fn retrieve(&self, query: &str) -> Vec<String>;
}

/// Produces a response for a fully built prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate text for `prompt`; failures carry no partial output
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Failure reported by a generation backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Network or protocol failure talking to the backend
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend refused the request for quota or rate-limit reasons
    #[error("Quota exceeded: {0}")]
    Quota(String),

    /// Backend did not answer in time
    #[error("Generation timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Any other backend failure
    #[error("Generation failed: {0}")]
    Other(String),
}
