//! LRU cache for built samples
//!
//! Structure decoding and graph construction dominate dataset iteration, so
//! repeated requests for the same identifier are served from a bounded,
//! least-recently-used cache. Capacity 0 disables caching entirely.

use std::collections::HashMap;

use super::BuiltSample;

/// LRU cache with fixed capacity, keyed by crystal identifier.
pub struct SampleCache {
    cache: HashMap<String, BuiltSample>,
    order: Vec<String>,
    capacity: usize,
}

impl SampleCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: HashMap::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn get(&mut self, id: &str) -> Option<BuiltSample> {
        if self.cache.contains_key(id) {
            // Move to end (most recently used)
            if let Some(pos) = self.order.iter().position(|k| k == id) {
                let k = self.order.remove(pos);
                self.order.push(k);
            }
            self.cache.get(id).cloned()
        } else {
            None
        }
    }

    pub fn insert(&mut self, id: String, value: BuiltSample) {
        if self.capacity == 0 {
            return;
        }
        if self.cache.len() >= self.capacity && !self.cache.contains_key(&id) {
            // Evict least recently used
            if !self.order.is_empty() {
                let lru_key = self.order.remove(0);
                self.cache.remove(&lru_key);
            }
        }

        if !self.cache.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.cache.insert(id, value);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::sample::GraphSample;
    use std::sync::Arc;

    fn dummy(id: &str) -> BuiltSample {
        BuiltSample {
            sample: Arc::new(GraphSample {
                atom_features: vec![30.0, 0.0],
                nbr_features: Vec::new(),
                nbr_indices: Vec::new(),
                primary_indices: vec![0],
                aux_features: Vec::new(),
                target: vec![0.0],
                id: id.to_string(),
                n_atoms: 1,
                max_num_nbr: 0,
                basis_len: 0,
            }),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_lru_eviction_order() {
        let mut cache = SampleCache::new(2);
        cache.insert("a".into(), dummy("a"));
        cache.insert("b".into(), dummy("b"));
        assert_eq!(cache.len(), 2);

        // Touch "a" so "b" becomes least recently used
        assert!(cache.get("a").is_some());
        cache.insert("c".into(), dummy("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_reinsert_does_not_evict() {
        let mut cache = SampleCache::new(2);
        cache.insert("a".into(), dummy("a"));
        cache.insert("b".into(), dummy("b"));
        cache.insert("a".into(), dummy("a"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_some());
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let mut cache = SampleCache::new(0);
        cache.insert("a".into(), dummy("a"));
        assert!(cache.is_empty());
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn test_clear() {
        let mut cache = SampleCache::new(4);
        cache.insert("a".into(), dummy("a"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
