//! Compiled-text caching for inline snippets.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Key-value store for compiled snippets.
///
/// The pipeline only promises set-after-compute; everything else (expiry,
/// eviction, consistency) is the implementation's own business. Reads are
/// fail-safe: any internal problem is a miss, never an error.
pub trait TextCache: Send + Sync {
    /// Returns the cached value, or `None` if absent or expired.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` for at most `ttl`.
    fn set(&self, key: &str, value: &str, ttl: Duration);
}

/// In-process cache with per-entry expiry.
///
/// Expired entries count as absent and are evicted by the read that finds
/// them; there is no background sweeper.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TextCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let Ok(mut entries) = self.entries.lock() else {
            return None;
        };
        let expired = match entries.get(key) {
            Some((value, deadline)) => {
                if Instant::now() < *deadline {
                    return Some(value.clone());
                }
                true
            }
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        None
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let cache = MemoryCache::new();
        cache.set("k", "compiled", Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some("compiled".to_string()));
    }

    #[test]
    fn test_missing_key() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("absent"), None);
    }

    #[test]
    fn test_zero_ttl_is_already_expired() {
        let cache = MemoryCache::new();
        cache.set("k", "compiled", Duration::ZERO);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let cache = MemoryCache::new();
        cache.set("k", "compiled", Duration::ZERO);
        assert_eq!(cache.len(), 1);
        cache.get("k");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_overwrites() {
        let cache = MemoryCache::new();
        cache.set("k", "first", Duration::from_secs(60));
        cache.set("k", "second", Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some("second".to_string()));
        assert_eq!(cache.len(), 1);
    }
}
