//! # Bounded Recency Cache
//!
//! Response cache for the retrieval-then-generate pipeline.
//!
//! ## Features
//!
//! - **Context Fingerprints**: keys derived from the query plus the retrieved
//!   passages, so the same question asked over different documents gets its
//!   own entry
//! - **LRU Eviction**: fixed capacity, least recently used entry evicted first
//! - **Eviction Notifications**: synchronous listener fired once per eviction,
//!   never for an explicit clear
//!
//! ## Example
//!
//! ```rust
//! use vault_rag::cache::{derive_key, CacheEntry, LruCache};
//!
//! # fn example() -> vault_rag::Result<()> {
//! let mut cache = LruCache::new(8)?;
//!
//! let context = vec!["LRU evicts oldest...".to_string()];
//! let key = derive_key("What is LRU?", &context);
//! cache.put(CacheEntry::new(key.clone(), "cached response".to_string(), context));
//!
//! if let Some(entry) = cache.get(&key) {
//!     println!("Cache hit: {}", entry.response);
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod entry;
pub mod key;
pub mod store;
pub mod types;

pub use entry::CacheEntry;
pub use key::{derive_key, KEY_SEPARATOR};
pub use store::LruCache;
pub use types::{CacheKey, EvictionListener};
