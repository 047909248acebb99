//! Synchronous notifications published by the pipeline

use crate::cache::CacheEntry;
use crate::pipeline::metrics::MetricsSnapshot;
use tracing::info;

/// Receives pipeline notifications.
///
/// Both callbacks run synchronously on the task that processed the query,
/// while the pipeline state is locked. They must not block.
pub trait PipelineObserver: Send + Sync {
    /// Called after every completed or failed query, and after a reset
    fn on_metrics(&self, _snapshot: &MetricsSnapshot) {}

    /// Called each time an entry is evicted for capacity (never on clear)
    fn on_eviction(&self, _entry: &CacheEntry) {}
}

/// Observer that writes every notification to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_metrics(&self, snapshot: &MetricsSnapshot) {
        info!("{}", snapshot);
    }

    fn on_eviction(&self, entry: &CacheEntry) {
        info!(
            "Evicted {} (age {:?}, {} passages, {} bytes)",
            entry.key,
            entry.age(),
            entry.context.len(),
            entry.size_bytes()
        );
    }
}
