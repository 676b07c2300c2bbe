//! Cache Store Module
//!
//! Couples the slot table and the eviction list so every mutation updates
//! both. Runtime commands and log replay both go through this type.

use crate::cache::{validate_key, CacheStats, Entry, EvictionList, SlotTable};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// The slot table and eviction list pair, plus counters.
///
/// Between calls the key set of the slot table always equals the key set of
/// the eviction list.
#[derive(Debug)]
pub struct CacheStore {
    slots: SlotTable,
    eviction: EvictionList,
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of resident entries
    /// * `slot_space_size` - Number of slots keys are hashed into
    pub fn new(capacity: usize, slot_space_size: usize) -> Self {
        Self {
            slots: SlotTable::new(slot_space_size),
            eviction: EvictionList::new(capacity),
            stats: CacheStats::new(),
        }
    }

    // == Check Put ==
    /// Verifies a put for `key` would be accepted, without mutating anything.
    pub fn check_put(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        if self.slots.can_place(key) {
            Ok(())
        } else {
            Err(CacheError::RingFull(key.to_string()))
        }
    }

    // == Put ==
    /// Places `key` in the slot table and appends it to the eviction list.
    ///
    /// If the insertion pushed the list over capacity, the evicted key is
    /// released from the slot table too and returned.
    pub fn put(&mut self, key: String, value: i64) -> Result<Option<Entry>> {
        validate_key(&key)?;
        if let Err(err) = self.slots.place(key.clone(), value) {
            self.stats.record_ring_full();
            return Err(err);
        }

        let evicted = self.eviction.upsert(key, value);
        if let Some(entry) = &evicted {
            self.slots.remove(&entry.key);
            self.stats.record_eviction();
        }

        self.stats.set_total_entries(self.eviction.len());
        Ok(evicted)
    }

    // == Get ==
    /// Returns the value resolved for a resident `key`.
    ///
    /// Keys that are not resident are `NotFound`. For resident keys the slot
    /// table's successor lookup decides which entry answers, so a key that
    /// was probed past its home slot reads the home slot's occupant.
    pub fn get(&mut self, key: &str) -> Result<i64> {
        let resolved = self
            .eviction
            .contains(key)
            .then(|| self.slots.lookup(key))
            .flatten()
            .map(|entry| entry.value);

        match resolved {
            Some(value) => {
                self.stats.record_hit();
                Ok(value)
            }
            None => {
                self.stats.record_miss();
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }

    // == Remove ==
    /// Removes `key` from both structures. Returns whether it was resident.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.slots.remove(key).is_some();
        if removed {
            self.eviction.remove(key);
            self.stats.set_total_entries(self.eviction.len());
        }
        removed
    }

    /// Whether `key` is resident.
    pub fn contains(&self, key: &str) -> bool {
        self.eviction.contains(key)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.eviction.len());
        stats
    }

    pub(crate) fn record_log_failure(&mut self) {
        self.stats.record_log_failure();
    }

    pub(crate) fn record_ring_full(&mut self) {
        self.stats.record_ring_full();
    }

    // == Introspection ==
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    pub fn eviction(&self) -> &EvictionList {
        &self.eviction
    }

    /// Checks that both structures hold the same keys with the same values.
    pub fn is_consistent(&self) -> bool {
        self.slots.len() == self.eviction.len()
            && self.slots.iter().all(|(_, entry)| {
                self.eviction.get(&entry.key) == Some(entry.value)
            })
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.eviction.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eviction.is_empty()
    }
}
