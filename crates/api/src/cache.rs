use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Fetched documents of the data tree, keyed by a hash of their path.
///
/// The data tree is static, so entries never go stale; a full cache drops a
/// quarter of its entries before inserting.
pub struct Cache {
    documents: DashMap<String, String>,
    enabled: bool,
    max_entries: usize,
}

impl Cache {
    pub fn new(enabled: bool, max_entries: usize) -> Self {
        Self {
            documents: DashMap::new(),
            enabled: enabled && max_entries > 0,
            max_entries,
        }
    }

    pub fn get(&self, path: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let key = self.hash_path(path);
        self.documents.get(&key).map(|r| r.value().clone())
    }

    pub fn set(&self, path: &str, document: String) {
        if !self.enabled {
            return;
        }
        if self.documents.len() >= self.max_entries {
            let to_remove: Vec<_> = self
                .documents
                .iter()
                .take((self.max_entries / 4).max(1))
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.documents.remove(&key);
            }
        }
        let key = self.hash_path(path);
        self.documents.insert(key, document);
    }

    fn hash_path(&self, path: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(path.trim_start_matches('/').as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            enabled: self.enabled,
            documents_cached: self.documents.len(),
            max_entries: self.max_entries,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub documents_cached: usize,
    pub max_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_and_leading_slash() {
        let cache = Cache::new(true, 10);
        cache.set("benchmarks/ace.types.json", "{}".to_string());

        assert_eq!(cache.get("/benchmarks/ace.types.json").as_deref(), Some("{}"));
        assert!(cache.get("benchmarks/msnbc.types.json").is_none());
    }

    #[test]
    fn test_eviction_keeps_size_bounded() {
        let cache = Cache::new(true, 4);
        for i in 0..10 {
            cache.set(&format!("file-{}", i), i.to_string());
        }

        assert!(cache.stats().documents_cached <= 4);
        assert_eq!(cache.get("file-9").as_deref(), Some("9"));
    }

    #[test]
    fn test_disabled_cache_stores_nothing() {
        let cache = Cache::new(false, 10);
        cache.set("a", "b".to_string());

        assert!(cache.get("a").is_none());
        assert_eq!(cache.stats().documents_cached, 0);
    }
}
