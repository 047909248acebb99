//! Aggregate pipeline metrics
//!
//! Counters only move forward. The single mutation path is
//! [`Metrics::record`], which applies one query outcome and hands back the
//! resulting snapshot for publication.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// One completed (or failed) query, as seen by the metrics aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsEvent {
    /// Served from cache; `latency` runs from the start of retrieval
    Hit { latency: Duration },

    /// Generated and cached; `generation_latency` covers the generator call only
    Miss {
        generation_latency: Duration,
        evictions: u64,
    },

    /// Generation failed; only the cache size is refreshed
    Failed,
}

/// Point-in-time copy of the pipeline metrics
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Queries answered from cache or by generation
    pub total_queries: u64,

    /// Queries answered from cache
    pub cache_hits: u64,

    /// Queries answered by generation
    pub cache_misses: u64,

    /// Entries removed to stay within capacity
    pub eviction_count: u64,

    /// Sum of generator call latencies over all misses
    pub total_llm_latency: Duration,

    /// Sum of end-to-end latencies over all hits
    pub total_cache_latency: Duration,

    /// Cache size after the most recent query
    pub current_cache_size: usize,

    /// Cache capacity
    pub capacity: usize,
}

impl MetricsSnapshot {
    /// Fraction of queries served from cache (0 when no queries ran)
    pub fn hit_ratio(&self) -> f64 {
        if self.total_queries == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_queries as f64
        }
    }

    /// Fraction of queries that needed generation (0 when no queries ran)
    pub fn miss_ratio(&self) -> f64 {
        if self.total_queries == 0 {
            0.0
        } else {
            self.cache_misses as f64 / self.total_queries as f64
        }
    }

    /// Mean hit-path latency
    pub fn avg_cache_latency(&self) -> Duration {
        average(self.total_cache_latency, self.cache_hits)
    }

    /// Mean generator latency over misses
    pub fn avg_llm_latency(&self) -> Duration {
        average(self.total_llm_latency, self.cache_misses)
    }

    /// Serialize the snapshot for export
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn average(total: Duration, count: u64) -> Duration {
    match u32::try_from(count) {
        Ok(0) => Duration::ZERO,
        Ok(n) => total / n,
        Err(_) => Duration::from_secs_f64(total.as_secs_f64() / count as f64),
    }
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Metrics {{ queries: {}, hits: {}, misses: {}, hit_ratio: {:.2}%, evictions: {}, cache: {}/{} }}",
            self.total_queries,
            self.cache_hits,
            self.cache_misses,
            self.hit_ratio() * 100.0,
            self.eviction_count,
            self.current_cache_size,
            self.capacity
        )
    }
}

/// Mutable metrics state owned by the pipeline
#[derive(Debug, Clone)]
pub struct Metrics {
    current: MetricsSnapshot,
}

impl Metrics {
    /// Zeroed metrics for a cache of the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            current: MetricsSnapshot {
                capacity,
                ..Default::default()
            },
        }
    }

    /// Apply one query outcome and return the updated snapshot
    pub fn record(&mut self, event: MetricsEvent, cache_size: usize) -> MetricsSnapshot {
        let m = &mut self.current;
        match event {
            MetricsEvent::Hit { latency } => {
                m.total_queries += 1;
                m.cache_hits += 1;
                m.total_cache_latency += latency;
            }
            MetricsEvent::Miss {
                generation_latency,
                evictions,
            } => {
                m.total_queries += 1;
                m.cache_misses += 1;
                m.eviction_count += evictions;
                m.total_llm_latency += generation_latency;
            }
            MetricsEvent::Failed => {}
        }
        m.current_cache_size = cache_size;
        m.clone()
    }

    /// Current snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.current.clone()
    }

    /// Zero every counter, keeping the capacity
    pub fn reset(&mut self) -> MetricsSnapshot {
        self.current = MetricsSnapshot {
            capacity: self.current.capacity,
            ..Default::default()
        };
        self.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_zero_queries() {
        let metrics = Metrics::new(8).snapshot();
        assert_eq!(metrics.hit_ratio(), 0.0);
        assert_eq!(metrics.miss_ratio(), 0.0);
        assert_eq!(metrics.avg_cache_latency(), Duration::ZERO);
        assert_eq!(metrics.avg_llm_latency(), Duration::ZERO);
        assert_eq!(metrics.capacity, 8);
    }

    #[test]
    fn test_hit_ratio() {
        let mut metrics = Metrics::new(8);
        for _ in 0..3 {
            metrics.record(MetricsEvent::Hit { latency: ms(2) }, 1);
        }
        let snapshot = metrics.record(
            MetricsEvent::Miss {
                generation_latency: ms(100),
                evictions: 0,
            },
            1,
        );

        assert_eq!(snapshot.total_queries, 4);
        assert_eq!(snapshot.hit_ratio(), 0.75);
        assert_eq!(snapshot.miss_ratio(), 0.25);
    }

    #[test]
    fn test_average_latencies() {
        let mut metrics = Metrics::new(8);
        metrics.record(MetricsEvent::Hit { latency: ms(2) }, 1);
        metrics.record(MetricsEvent::Hit { latency: ms(4) }, 1);
        metrics.record(
            MetricsEvent::Miss {
                generation_latency: ms(300),
                evictions: 0,
            },
            2,
        );
        let snapshot = metrics.record(
            MetricsEvent::Miss {
                generation_latency: ms(100),
                evictions: 1,
            },
            2,
        );

        assert_eq!(snapshot.avg_cache_latency(), ms(3));
        assert_eq!(snapshot.avg_llm_latency(), ms(200));
        assert_eq!(snapshot.eviction_count, 1);
    }

    #[test]
    fn test_failure_only_refreshes_size() {
        let mut metrics = Metrics::new(8);
        metrics.record(
            MetricsEvent::Miss {
                generation_latency: ms(50),
                evictions: 0,
            },
            1,
        );
        let before = metrics.snapshot();
        let after = metrics.record(MetricsEvent::Failed, 1);

        assert_eq!(before, after);
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut metrics = Metrics::new(4);
        metrics.record(MetricsEvent::Hit { latency: ms(1) }, 3);

        let snapshot = metrics.reset();
        assert_eq!(snapshot, MetricsSnapshot {
            capacity: 4,
            ..Default::default()
        });
    }

    #[test]
    fn test_display_and_json() {
        let mut metrics = Metrics::new(8);
        let snapshot = metrics.record(MetricsEvent::Hit { latency: ms(5) }, 1);

        let display = format!("{}", snapshot);
        assert!(display.contains("hits: 1"));
        assert!(display.contains("cache: 1/8"));

        let json = snapshot.to_json().unwrap();
        let parsed: MetricsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
