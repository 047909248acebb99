//! Cached pipeline results

use crate::cache::types::CacheKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A generated response together with the context it was produced from.
///
/// Entries are never mutated once inserted; storing under an existing key
/// replaces the whole entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Fingerprint of the query and context
    pub key: CacheKey,

    /// Generated text
    pub response: String,

    /// Retrieved passages, in retrieval order
    pub context: Vec<String>,

    /// When the entry was created
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry stamped with the current time
    pub fn new(key: CacheKey, response: String, context: Vec<String>) -> Self {
        Self::with_timestamp(key, response, context, Utc::now())
    }

    /// Create an entry with an explicit creation time
    pub fn with_timestamp(
        key: CacheKey,
        response: String,
        context: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            response,
            context,
            timestamp,
        }
    }

    /// Time elapsed since the entry was created
    pub fn age(&self) -> Duration {
        (Utc::now() - self.timestamp)
            .to_std()
            .unwrap_or(Duration::from_secs(0))
    }

    /// Approximate heap footprint of the entry in bytes
    pub fn size_bytes(&self) -> usize {
        self.key.len()
            + self.response.len()
            + self.context.iter().map(String::len).sum::<usize>()
    }
}
