//! Bounded recency cache with O(1) lookup, refresh and eviction

use crate::cache::{
    entry::CacheEntry,
    types::{CacheKey, EvictionListener},
};
use crate::error::{Result, VaultError};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

/// Fixed-capacity least-recently-used cache of pipeline results
///
/// Entries live in an arena of slots threaded onto a doubly-linked recency
/// list. `head` is the least recently used entry and `tail` the most
/// recently used one. The key index maps each key to its slot, so `get`,
/// `put` and eviction never scan.
///
/// `len() <= capacity()` holds after every operation.
pub struct LruCache {
    /// Maximum number of entries, fixed at construction
    capacity: usize,

    /// Key -> slot index
    index: HashMap<CacheKey, usize>,

    /// Slot arena; `None` marks a free slot
    slots: Vec<Option<Node>>,

    /// Free slot indices available for reuse
    free: Vec<usize>,

    /// Least recently used slot
    head: Option<usize>,

    /// Most recently used slot
    tail: Option<usize>,

    /// Fired once per capacity eviction
    on_evict: Option<EvictionListener>,
}

struct Node {
    entry: CacheEntry,
    prev: Option<usize>,
    next: Option<usize>,
}

impl LruCache {
    /// Create an empty cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(VaultError::InvalidCapacity { capacity });
        }

        info!("Initializing LRU cache with capacity {}", capacity);

        Ok(Self {
            capacity,
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            on_evict: None,
        })
    }

    /// Register a callback fired synchronously for every capacity eviction
    pub fn with_eviction_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&CacheEntry) + Send + Sync + 'static,
    {
        self.on_evict = Some(Box::new(listener));
        self
    }

    /// Look up an entry and mark it most recently used
    pub fn get(&mut self, key: &str) -> Option<&CacheEntry> {
        let idx = *self.index.get(key)?;
        self.move_to_back(idx);
        debug!("LRU hit: {}", key);
        self.node(idx).map(|node| &node.entry)
    }

    /// Look up an entry without touching recency order
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        let idx = *self.index.get(key)?;
        self.node(idx).map(|node| &node.entry)
    }

    /// Check if a key is cached without touching recency order
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Store an entry under its own key at the most recently used position
    ///
    /// An existing entry under the same key is replaced wholesale and no
    /// eviction happens. Otherwise, when the cache is full, the least
    /// recently used entry is removed first, the eviction listener fires
    /// once, and the removed entry is returned.
    pub fn put(&mut self, entry: CacheEntry) -> Option<CacheEntry> {
        if let Some(&idx) = self.index.get(&entry.key) {
            debug!("Replacing cache entry: {}", entry.key);
            if let Some(node) = self.node_mut(idx) {
                node.entry = entry;
            }
            self.move_to_back(idx);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.pop_front()
        } else {
            None
        };

        if let Some(old) = &evicted {
            debug!("Evicting least recently used entry: {}", old.key);
            if let Some(listener) = &self.on_evict {
                listener(old);
            }
        }

        debug!("Inserting cache entry: {}", entry.key);
        let key = entry.key.clone();
        let idx = self.alloc(Node {
            entry,
            prev: None,
            next: None,
        });
        self.push_back(idx);
        self.index.insert(key, idx);

        evicted
    }

    /// Remove every entry without firing the eviction listener
    pub fn clear(&mut self) {
        let count = self.index.len();
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;

        info!("Cleared {} entries from cache", count);
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys ordered from least to most recently used
    pub fn keys_by_recency(&self) -> Vec<CacheKey> {
        let mut keys = Vec::with_capacity(self.index.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            match self.node(idx) {
                Some(node) => {
                    keys.push(node.entry.key.clone());
                    cursor = node.next;
                }
                None => break,
            }
        }
        keys
    }

    fn node(&self, idx: usize) -> Option<&Node> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    fn alloc(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    /// Detach a slot from the recency list, leaving it allocated
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.node(idx) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = None;
        }
    }

    fn push_back(&mut self, idx: usize) {
        let old_tail = self.tail;
        if let Some(node) = self.node_mut(idx) {
            node.prev = old_tail;
            node.next = None;
        }

        match old_tail {
            Some(t) => {
                if let Some(node) = self.node_mut(t) {
                    node.next = Some(idx);
                }
            }
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }

    fn move_to_back(&mut self, idx: usize) {
        if self.tail == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_back(idx);
    }

    fn pop_front(&mut self) -> Option<CacheEntry> {
        let idx = self.head?;
        self.unlink(idx);
        let node = self.slots.get_mut(idx)?.take()?;
        self.free.push(idx);
        self.index.remove(&node.entry.key);
        Some(node.entry)
    }
}

impl fmt::Debug for LruCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.index.len())
            .field("keys", &self.keys_by_recency())
            .field("has_eviction_listener", &self.on_evict.is_some())
            .finish()
    }
}
