use std::collections::HashMap;

use tracing::debug;

use crate::tile::TileKey;

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    last_used_tick: u64,
}

/// Bounded tile cache with least-recently-used eviction.
///
/// Generic over the stored value so the UI can keep GPU textures while
/// tests use plain data. Ties on the use tick are broken by key order so
/// eviction is deterministic.
#[derive(Debug)]
pub struct TileCache<V> {
    capacity: usize,
    tick: u64,
    entries: HashMap<TileKey, CacheEntry<V>>,
}

impl<V> TileCache<V> {
    /// `capacity` is clamped to at least one entry.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            tick: 0,
            entries: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &TileKey) -> bool {
        self.entries.contains_key(key)
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Look up a tile and mark it as recently used.
    pub fn get(&mut self, key: &TileKey) -> Option<&V> {
        let tick = self.next_tick();
        let entry = self.entries.get_mut(key)?;
        entry.last_used_tick = tick;
        Some(&entry.value)
    }

    /// Look up a tile without affecting eviction order.
    pub fn peek(&self, key: &TileKey) -> Option<&V> {
        self.entries.get(key).map(|e| &e.value)
    }

    /// Insert or replace a tile. Returns the entry evicted to make room.
    pub fn insert(&mut self, key: TileKey, value: V) -> Option<(TileKey, V)> {
        let tick = self.next_tick();
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            entry.last_used_tick = tick;
            return None;
        }
        let evicted = if self.entries.len() >= self.capacity {
            self.evict_one()
        } else {
            None
        };
        self.entries.insert(
            key,
            CacheEntry {
                value,
                last_used_tick: tick,
            },
        );
        evicted
    }

    /// Shrink or grow the cache, evicting the oldest entries if needed.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.evict_one();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn evict_one(&mut self) -> Option<(TileKey, V)> {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(key, entry)| (entry.last_used_tick, **key))
            .map(|(key, _)| *key)?;
        debug!(z = oldest.z, x = oldest.x, y = oldest.y, "Evicting tile");
        self.entries.remove(&oldest).map(|e| (oldest, e.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(x: u32) -> TileKey {
        TileKey::new(4, x, 0)
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = TileCache::new(2);
        assert!(cache.insert(key(1), "a").is_none());
        assert!(cache.insert(key(2), "b").is_none());
        // Touch 1 so 2 becomes the oldest.
        assert_eq!(cache.get(&key(1)), Some(&"a"));
        let evicted = cache.insert(key(3), "c");
        assert_eq!(evicted, Some((key(2), "b")));
        assert!(cache.contains(&key(1)));
        assert!(cache.contains(&key(3)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn peek_does_not_refresh() {
        let mut cache = TileCache::new(2);
        cache.insert(key(1), 1);
        cache.insert(key(2), 2);
        assert_eq!(cache.peek(&key(1)), Some(&1));
        let evicted = cache.insert(key(3), 3);
        assert_eq!(evicted.map(|(k, _)| k), Some(key(1)));
    }

    #[test]
    fn replacing_does_not_evict() {
        let mut cache = TileCache::new(1);
        cache.insert(key(1), 1);
        assert!(cache.insert(key(1), 10).is_none());
        assert_eq!(cache.peek(&key(1)), Some(&10));
    }

    #[test]
    fn shrinking_evicts_oldest() {
        let mut cache = TileCache::new(4);
        for x in 0..4 {
            cache.insert(key(x), x);
        }
        cache.set_capacity(2);
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&key(2)) && cache.contains(&key(3)));
    }

    #[test]
    fn zero_capacity_holds_one() {
        let mut cache = TileCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.insert(key(1), ());
        cache.insert(key(2), ());
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&key(2)));
        cache.clear();
        assert!(cache.is_empty());
    }
}
