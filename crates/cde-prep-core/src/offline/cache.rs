use indexmap::IndexMap;

use super::request::Response;

/// One named cache bucket: request URL → stored response.
#[derive(Debug, Clone, Default)]
pub struct Cache {
    entries: IndexMap<String, Response>,
}

impl Cache {
    pub fn get(&self, url: &str) -> Option<&Response> {
        self.entries.get(url)
    }

    pub fn put(&mut self, url: impl Into<String>, response: Response) {
        self.entries.insert(url.into(), response);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All named caches, in creation order.
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    caches: IndexMap<String, Cache>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cache called `name`, creating it if needed.
    pub fn open(&mut self, name: &str) -> &mut Cache {
        self.caches.entry(name.to_string()).or_default()
    }

    pub fn get(&self, name: &str) -> Option<&Cache> {
        self.caches.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.caches.contains_key(name)
    }

    /// Returns whether a cache was removed.
    pub fn delete(&mut self, name: &str) -> bool {
        self.caches.shift_remove(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.caches.keys().map(String::as_str)
    }

    /// Look `url` up across every cache, oldest first.
    pub fn match_url(&self, url: &str) -> Option<&Response> {
        self.caches.values().find_map(|c| c.get(url))
    }
}
