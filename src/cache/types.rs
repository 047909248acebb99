//! Core type definitions for the cache system

use crate::cache::entry::CacheEntry;

/// Cache key type: the hex fingerprint of a query and its context
pub type CacheKey = String;

/// Callback invoked synchronously for every capacity eviction
pub type EvictionListener = Box<dyn Fn(&CacheEntry) + Send + Sync>;
