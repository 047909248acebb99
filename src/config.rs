//! Configuration for the vault pipeline

use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable holding the cache capacity
pub const ENV_CAPACITY: &str = "VAULT_CACHE_CAPACITY";

/// Environment variable overriding the failure message
pub const ENV_FAILURE_MESSAGE: &str = "VAULT_FAILURE_MESSAGE";

/// Environment variable overriding the empty-context placeholder
pub const ENV_EMPTY_CONTEXT_PLACEHOLDER: &str = "VAULT_EMPTY_CONTEXT_PLACEHOLDER";

/// Environment variable overriding the empty-generation fallback
pub const ENV_FALLBACK_RESPONSE: &str = "VAULT_FALLBACK_RESPONSE";

/// Configuration for the retrieval-then-generate pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of cached responses
    pub capacity: usize,

    /// Response returned to the caller when generation fails
    pub failure_message: String,

    /// Context text placed in the prompt when retrieval found nothing
    pub empty_context_placeholder: String,

    /// Response used when the generator returns blank text
    pub fallback_response: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capacity: 8,
            failure_message: "An error occurred while processing your request.".to_string(),
            empty_context_placeholder: "No specific documents found in vault.".to_string(),
            fallback_response: "I couldn't generate a response.".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create a new builder for pipeline configuration
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Default configuration with a different cache capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(VaultError::InvalidCapacity {
                capacity: self.capacity,
            });
        }

        if self.failure_message.trim().is_empty() {
            return Err(VaultError::ConfigError(
                "failure_message must not be empty".to_string(),
            ));
        }

        if self.fallback_response.trim().is_empty() {
            return Err(VaultError::ConfigError(
                "fallback_response must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from the process environment
    ///
    /// A `.env` file in the working directory is read first if present.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(raw) = lookup(ENV_CAPACITY) {
            let capacity = raw.trim().parse::<usize>().map_err(|e| {
                VaultError::ConfigError(format!("{} must be a positive integer: {}", ENV_CAPACITY, e))
            })?;
            builder = builder.capacity(capacity);
        }
        if let Some(message) = lookup(ENV_FAILURE_MESSAGE) {
            builder = builder.failure_message(message);
        }
        if let Some(placeholder) = lookup(ENV_EMPTY_CONTEXT_PLACEHOLDER) {
            builder = builder.empty_context_placeholder(placeholder);
        }
        if let Some(fallback) = lookup(ENV_FALLBACK_RESPONSE) {
            builder = builder.fallback_response(fallback);
        }

        let config = builder.build();
        config.validate()?;
        debug!("Loaded pipeline config: {:?}", config);
        Ok(config)
    }
}

/// Builder for pipeline configuration
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    capacity: Option<usize>,
    failure_message: Option<String>,
    empty_context_placeholder: Option<String>,
    fallback_response: Option<String>,
}

impl PipelineConfigBuilder {
    /// Set the cache capacity
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the message returned when generation fails
    pub fn failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = Some(message.into());
        self
    }

    /// Set the prompt placeholder used for empty context
    pub fn empty_context_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.empty_context_placeholder = Some(placeholder.into());
        self
    }

    /// Set the response used when generation returns blank text
    pub fn fallback_response(mut self, fallback: impl Into<String>) -> Self {
        self.fallback_response = Some(fallback.into());
        self
    }

    /// Build the pipeline configuration
    pub fn build(self) -> PipelineConfig {
        let defaults = PipelineConfig::default();

        PipelineConfig {
            capacity: self.capacity.unwrap_or(defaults.capacity),
            failure_message: self.failure_message.unwrap_or(defaults.failure_message),
            empty_context_placeholder: self
                .empty_context_placeholder
                .unwrap_or(defaults.empty_context_placeholder),
            fallback_response: self
                .fallback_response
                .unwrap_or(defaults.fallback_response),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.capacity, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let invalid = PipelineConfig::with_capacity(0);
        assert!(matches!(
            invalid.validate(),
            Err(VaultError::InvalidCapacity { capacity: 0 })
        ));

        let invalid = PipelineConfig::builder().failure_message("   ").build();
        assert!(matches!(invalid.validate(), Err(VaultError::ConfigError(_))));
    }

    #[test]
    fn test_config_builder() {
        let config = PipelineConfig::builder()
            .capacity(2)
            .failure_message("generation unavailable")
            .build();

        assert_eq!(config.capacity, 2);
        assert_eq!(config.failure_message, "generation unavailable");
        assert_eq!(
            config.empty_context_placeholder,
            PipelineConfig::default().empty_context_placeholder
        );
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = PipelineConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = PipelineConfig::from_lookup(lookup_from(&[
            (ENV_CAPACITY, " 32 "),
            (ENV_FAILURE_MESSAGE, "try again later"),
        ]))
        .unwrap();

        assert_eq!(config.capacity, 32);
        assert_eq!(config.failure_message, "try again later");
    }

    #[test]
    fn test_from_lookup_rejects_bad_capacity() {
        let err = PipelineConfig::from_lookup(lookup_from(&[(ENV_CAPACITY, "-1")])).unwrap_err();
        assert!(matches!(err, VaultError::ConfigError(_)));

        let err = PipelineConfig::from_lookup(lookup_from(&[(ENV_CAPACITY, "0")])).unwrap_err();
        assert!(matches!(err, VaultError::InvalidCapacity { .. }));
    }

    #[test]
    fn test_config_serialization() {
        let config = PipelineConfig::with_capacity(16);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
