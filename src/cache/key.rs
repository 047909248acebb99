//! Cache key derivation
//!
//! A key is a literal-content fingerprint of the query followed by each
//! retrieved passage, separated by [`KEY_SEPARATOR`]. The reduction is a
//! 32-bit `h * 31 + unit` rolling hash over UTF-16 code units, rendered as
//! eight lowercase hex digits.
//!
//! The hash is not collision free. Two distinct inputs that share a
//! fingerprint share a cache slot; swapping in a wider or cryptographic
//! digest changes which entries coalesce.

use crate::cache::types::CacheKey;

/// Separator placed between the query and each context passage
pub const KEY_SEPARATOR: char = '\n';

/// Derive the cache key for a query and its retrieved context.
///
/// Passage order is significant: `["a", "b"]` and `["b", "a"]` produce
/// different fingerprints.
///
/// ```
/// use vault_rag::cache::derive_key;
///
/// let key = derive_key("What is LRU?", &["LRU evicts oldest...".to_string()]);
/// assert_eq!(key, derive_key("What is LRU?", &["LRU evicts oldest...".to_string()]));
/// assert_eq!(key.len(), 8);
/// ```
pub fn derive_key(query: &str, context: &[String]) -> CacheKey {
    let mut hash = RollingHash::default();
    hash.update(query);
    for passage in context {
        hash.update_char(KEY_SEPARATOR);
        hash.update(passage);
    }
    hash.hex()
}

/// 32-bit multiplicative rolling hash, wrapping on overflow
#[derive(Debug, Default, Clone, Copy)]
struct RollingHash(u32);

impl RollingHash {
    fn update(&mut self, s: &str) {
        for unit in s.encode_utf16() {
            self.push(unit);
        }
    }

    fn update_char(&mut self, c: char) {
        let mut buf = [0u16; 2];
        for unit in c.encode_utf16(&mut buf) {
            self.push(*unit);
        }
    }

    fn push(&mut self, unit: u16) {
        self.0 = self.0.wrapping_mul(31).wrapping_add(u32::from(unit));
    }

    fn hex(self) -> CacheKey {
        format!("{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ctx(passages: &[&str]) -> Vec<String> {
        passages.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_known_fingerprints() {
        assert_eq!(derive_key("", &[]), "00000000");
        assert_eq!(derive_key("a", &[]), "00000061");
        assert_eq!(derive_key("ab", &[]), "00000c21");
        assert_eq!(derive_key("a", &ctx(&["b"])), "00016db9");
        assert_eq!(
            derive_key("What is LRU?", &ctx(&["LRU evicts oldest..."])),
            "195f8bea"
        );
    }

    #[test]
    fn test_non_bmp_characters_hash_as_surrogate_pairs() {
        assert_eq!(derive_key("é", &[]), "000000e9");
        assert_eq!(derive_key("😀", &[]), "001b0d63");
    }

    #[test]
    fn test_deterministic() {
        let context = ctx(&["first passage", "second passage"]);
        assert_eq!(
            derive_key("query", &context),
            derive_key("query", &context)
        );
    }

    #[test]
    fn test_fixed_width() {
        for query in ["", "x", "a much longer query with many words in it"] {
            assert_eq!(derive_key(query, &[]).len(), 8);
        }
    }

    #[test]
    fn test_context_order_is_significant() {
        let forward = derive_key("q", &ctx(&["alpha", "beta"]));
        let reversed = derive_key("q", &ctx(&["beta", "alpha"]));
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_context_changes_key() {
        assert_ne!(derive_key("q", &[]), derive_key("q", &ctx(&["doc"])));
    }

    #[test]
    fn test_collisions_are_rare() {
        let keys: HashSet<CacheKey> = (0..10_000)
            .map(|i| derive_key(&format!("query number {}", i), &ctx(&["shared context"])))
            .collect();

        // A 32-bit space over 10k inputs should see at most a handful of collisions
        assert!(keys.len() >= 9_990, "too many collisions: {}", 10_000 - keys.len());
    }
}
