use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use anyhow::{Result, bail};

/// Bounded key-value cache with strict first-in-first-out eviction.
///
/// Reads never promote an entry and overwrites never reorder it, so the key
/// evicted at capacity is always the longest-resident surviving one. The
/// insertion queue keeps stamped entries and skips stale ones lazily, which
/// keeps put/get/delete O(1) amortized without a linked list.
#[derive(Debug, Clone)]
pub struct FifoCache<K: Eq + Hash + Clone, V> {
    capacity: usize,
    map: HashMap<K, Slot<V>>,
    order: VecDeque<(K, u64)>,
    next_stamp: u64,
}

#[derive(Debug, Clone)]
struct Slot<V> {
    value: V,
    stamp: u64,
}

impl<K: Eq + Hash + Clone, V> FifoCache<K, V> {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity < 1 {
            bail!("fifo cache capacity must be at least 1, got {capacity}");
        }
        Ok(Self {
            capacity,
            map: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            next_stamp: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn has(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|slot| &slot.value)
    }

    /// Inserts or updates. Returns the evicted key, if any. Updating an
    /// existing key keeps its position in the eviction queue.
    pub fn put(&mut self, key: K, value: V) -> Option<K> {
        if let Some(slot) = self.map.get_mut(&key) {
            slot.value = value;
            return None;
        }

        let mut evicted = None;
        if self.map.len() >= self.capacity {
            evicted = self.evict_oldest();
        }

        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.order.push_back((key.clone(), stamp));
        self.map.insert(key, Slot { value, stamp });
        evicted
    }

    pub fn delete(&mut self, key: &K) -> bool {
        // The queue entry goes stale and is skipped at eviction time.
        self.map.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    /// Live keys, newest-inserted-first. A convenience view, not a
    /// structural invariant.
    pub fn keys(&self) -> Vec<&K> {
        self.iter_live().map(|(key, _)| key).collect()
    }

    /// Live key/value pairs, newest-inserted-first.
    pub fn entries(&self) -> Vec<(&K, &V)> {
        self.iter_live().collect()
    }

    fn iter_live(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order.iter().rev().filter_map(|(key, stamp)| {
            let slot = self.map.get(key)?;
            (slot.stamp == *stamp).then_some((key, &slot.value))
        })
    }

    fn evict_oldest(&mut self) -> Option<K> {
        while let Some((key, stamp)) = self.order.pop_front() {
            let live = self
                .map
                .get(&key)
                .is_some_and(|slot| slot.stamp == stamp);
            if live {
                self.map.remove(&key);
                return Some(key);
            }
        }
        None
    }
}
