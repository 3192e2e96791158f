//! In-process cache backed by a map.

use super::{CacheResult, LocalCache};
use std::collections::BTreeMap;

/// Non-persistent cache, for tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryCache {
    entries: BTreeMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the stored keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CacheResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> CacheResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}
