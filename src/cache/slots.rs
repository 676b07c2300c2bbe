//! Slot Table Module
//!
//! Places keys in a fixed-size hashed slot space with linear probing and
//! resolves lookups by successor.

use std::collections::{BTreeMap, HashMap};

use crate::cache::Entry;
use crate::error::{CacheError, Result};

// == Hashing ==
/// Deterministic string hash: `h = 31 * h + unit` over UTF-16 code units,
/// wrapping in 32 bits.
///
/// Stable across processes, which recovery relies on to put replayed keys
/// back where they were.
pub fn string_hash(key: &str) -> i32 {
    key.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Home slot of `key` in a slot space of `limit` slots.
pub fn home_slot(key: &str, limit: usize) -> usize {
    (string_hash(key) as i64 % limit as i64).unsigned_abs() as usize
}

// == Slot Table ==
/// Sparse mapping from slot index in `[0, limit)` to at most one entry.
///
/// Slots are kept ordered so successor lookups are a range scan. The key
/// index records the slot each key actually landed on after probing.
#[derive(Debug)]
pub struct SlotTable {
    slots: BTreeMap<usize, Entry>,
    index: HashMap<String, usize>,
    limit: usize,
}

impl SlotTable {
    // == Constructor ==
    /// Creates an empty table over `limit` slots.
    pub fn new(limit: usize) -> Self {
        debug_assert!(limit > 0, "slot space must not be empty");
        Self {
            slots: BTreeMap::new(),
            index: HashMap::new(),
            limit,
        }
    }

    // == Place ==
    /// Stores `key` at its home slot, or the next free slot after it.
    ///
    /// A key that already holds a slot keeps it and only its value changes.
    /// Returns the slot used, or `RingFull` when every slot is taken.
    pub fn place(&mut self, key: String, value: i64) -> Result<usize> {
        if let Some(&slot) = self.index.get(&key) {
            if let Some(entry) = self.slots.get_mut(&slot) {
                entry.value = value;
            }
            return Ok(slot);
        }

        let slot = self
            .free_slot_for(&key)
            .ok_or_else(|| CacheError::RingFull(key.clone()))?;

        self.index.insert(key.clone(), slot);
        self.slots.insert(slot, Entry { key, value });
        Ok(slot)
    }

    /// Whether `place` would succeed for `key`.
    pub fn can_place(&self, key: &str) -> bool {
        self.index.contains_key(key) || self.free_slot_for(key).is_some()
    }

    // == Lookup ==
    /// Resolves `key` to the occupant of its home slot, or else the first
    /// occupied slot after it, wrapping to the lowest occupied slot.
    ///
    /// The returned entry may belong to a different key once probing has
    /// displaced keys from their home slots.
    pub fn lookup(&self, key: &str) -> Option<&Entry> {
        let home = home_slot(key, self.limit);
        self.slots
            .range(home..)
            .next()
            .or_else(|| self.slots.iter().next())
            .map(|(_, entry)| entry)
    }

    // == Remove ==
    /// Frees the slot `key` occupies, whether it is the home slot or one
    /// reached by probing.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        let slot = self.index.remove(key)?;
        self.slots.remove(&slot)
    }

    /// Slot currently held by `key`.
    pub fn slot_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Occupied slots in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Entry)> + '_ {
        self.slots.iter().map(|(&slot, entry)| (slot, entry))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    // == Probing ==
    fn free_slot_for(&self, key: &str) -> Option<usize> {
        if self.slots.len() >= self.limit {
            return None;
        }
        let home = home_slot(key, self.limit);
        (0..self.limit)
            .map(|offset| (home + offset) % self.limit)
            .find(|slot| !self.slots.contains_key(slot))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_hash_known_values() {
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_hash("a"), 97);
        assert_eq!(string_hash("ab"), 97 * 31 + 98);
        // Classic collision pair
        assert_eq!(string_hash("Aa"), 2112);
        assert_eq!(string_hash("BB"), 2112);
    }

    #[test]
    fn test_home_slot_handles_negative_hash() {
        let key = (0..1_000)
            .map(|i| format!("overflowing-key-{}", i))
            .find(|k| string_hash(k) < 0)
            .unwrap();

        assert!(home_slot(&key, 100) < 100);
        assert_eq!(
            home_slot(&key, 100),
            (string_hash(&key) % 100).unsigned_abs() as usize
        );
    }

    #[test]
    fn test_place_at_home_slot() {
        let mut table = SlotTable::new(100);

        let slot = table.place("a".into(), 1).unwrap();

        assert_eq!(slot, 97);
        assert_eq!(table.slot_of("a"), Some(97));
        assert_eq!(table.lookup("a"), Some(&Entry::new("a", 1)));
    }

    #[test]
    fn test_place_probes_past_collision() {
        let mut table = SlotTable::new(100);

        assert_eq!(table.place("Aa".into(), 1).unwrap(), 12);
        assert_eq!(table.place("BB".into(), 2).unwrap(), 13);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_place_wraps_around() {
        let mut table = SlotTable::new(100);

        // "c" hashes to 99
        table.place("c".into(), 1).unwrap();
        // Another key homed at 99 wraps to slot 0
        let other = (0..10_000)
            .map(|i| format!("w{}", i))
            .find(|k| home_slot(k, 100) == 99)
            .unwrap();

        assert_eq!(table.place(other, 2).unwrap(), 0);
    }

    #[test]
    fn test_place_existing_key_updates_in_place() {
        let mut table = SlotTable::new(100);

        table.place("a".into(), 1).unwrap();
        let slot = table.place("a".into(), 5).unwrap();

        assert_eq!(slot, 97);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("a").map(|e| e.value), Some(5));
    }

    #[test]
    fn test_place_fails_when_full() {
        let mut table = SlotTable::new(2);

        table.place("x".into(), 1).unwrap();
        table.place("y".into(), 2).unwrap();

        assert!(!table.can_place("z"));
        assert!(matches!(
            table.place("z".into(), 3),
            Err(CacheError::RingFull(_))
        ));
        // A resident key can still be updated
        assert!(table.can_place("x"));
        assert!(table.place("x".into(), 9).is_ok());
    }

    #[test]
    fn test_lookup_empty_table() {
        let table = SlotTable::new(100);
        assert!(table.lookup("anything").is_none());
    }

    #[test]
    fn test_lookup_returns_home_occupant_on_collision() {
        let mut table = SlotTable::new(100);

        table.place("Aa".into(), 1).unwrap();
        table.place("BB".into(), 2).unwrap();

        // Both keys resolve to slot 12, which holds "Aa"
        assert_eq!(table.lookup("BB"), Some(&Entry::new("Aa", 1)));
        assert_eq!(table.lookup("Aa"), Some(&Entry::new("Aa", 1)));
    }

    #[test]
    fn test_lookup_successor_and_wrap() {
        let mut table = SlotTable::new(100);

        // "b" at 98, "!" (33) at 33
        table.place("b".into(), 2).unwrap();
        table.place("!".into(), 3).unwrap();

        // "a" homes at 97: successor is 98
        assert_eq!(table.lookup("a").map(|e| e.key.as_str()), Some("b"));
        // "c" homes at 99: nothing after it, wraps to 33
        assert_eq!(table.lookup("c").map(|e| e.key.as_str()), Some("!"));
    }

    #[test]
    fn test_remove_probed_key() {
        let mut table = SlotTable::new(100);

        table.place("Aa".into(), 1).unwrap();
        table.place("BB".into(), 2).unwrap();

        assert_eq!(table.remove("BB"), Some(Entry::new("BB", 2)));
        assert_eq!(table.slot_of("BB"), None);
        assert_eq!(table.slot_of("Aa"), Some(12));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_missing_key() {
        let mut table = SlotTable::new(100);
        table.place("Aa".into(), 1).unwrap();

        // "BB" shares the home slot but is not resident
        assert!(table.remove("BB").is_none());
        assert!(table.contains_key("Aa"));
    }

    #[test]
    fn test_freed_slot_is_reused() {
        let mut table = SlotTable::new(100);

        table.place("Aa".into(), 1).unwrap();
        table.remove("Aa");

        assert_eq!(table.place("BB".into(), 2).unwrap(), 12);
    }
}
