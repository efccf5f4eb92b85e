use std::collections::{HashMap, VecDeque};

use serde_json::Value;

/// Identifier to content map with oldest-first eviction. Only successful
/// fetches are stored, so failed identifiers retry on their next hover.
pub struct ContentCache {
    entries: HashMap<String, Value>,
    order: VecDeque<String>,
    capacity: Option<usize>,
}

impl ContentCache {
    /// `None` capacity leaves the cache unbounded for the process lifetime.
    pub fn new(capacity: Option<usize>) -> Self {
        ContentCache {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    pub fn get(&self, ident: &str) -> Option<&Value> {
        self.entries.get(ident)
    }

    pub fn insert(&mut self, ident: String, content: Value) {
        if self.entries.insert(ident.clone(), content).is_none() {
            self.order.push_back(ident);
        }

        if let Some(capacity) = self.capacity {
            while self.order.len() > capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_eviction_drops_oldest() {
        let mut cache = ContentCache::new(Some(2));
        cache.insert("a".into(), json!(1));
        cache.insert("b".into(), json!(2));
        cache.insert("c".into(), json!(3));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("b"), Some(&json!(2)));
        assert_eq!(cache.get("c"), Some(&json!(3)));
    }

    #[test]
    fn test_reinsert_does_not_duplicate() {
        let mut cache = ContentCache::new(Some(2));
        cache.insert("a".into(), json!(1));
        cache.insert("a".into(), json!(2));
        cache.insert("b".into(), json!(3));

        // "a" still present; the update must not have consumed a slot.
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(&json!(2)));
    }

    #[test]
    fn test_unbounded() {
        let mut cache = ContentCache::new(None);
        for i in 0..1000 {
            cache.insert(format!("{i}"), json!(i));
        }
        assert_eq!(cache.len(), 1000);
    }

    #[test]
    fn test_clear() {
        let mut cache = ContentCache::new(None);
        cache.insert("a".into(), json!(1));
        cache.clear();
        assert!(cache.is_empty());
    }
}
