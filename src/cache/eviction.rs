//! Eviction List Module
//!
//! Bounded insertion-order list deciding which resident key is evicted when
//! capacity is exceeded.

use std::collections::HashMap;

use crate::cache::Entry;

/// Arena index of a node.
type NodeIndex = usize;

/// Sentinel for a missing link.
const NIL: NodeIndex = usize::MAX;

#[derive(Debug, Clone)]
struct Node {
    entry: Entry,
    /// Older neighbour
    prev: NodeIndex,
    /// Newer neighbour
    next: NodeIndex,
}

// == Eviction List ==
/// Tracks insertion order of resident entries with a fixed capacity.
///
/// Nodes live in a contiguous arena and link to each other by index:
/// - Head = oldest surviving insertion (next to be evicted)
/// - Tail = newest insertion
///
/// Reads never reorder the list; only a re-insertion moves a key to the tail.
#[derive(Debug)]
pub struct EvictionList {
    arena: Vec<Node>,
    /// Recycled arena slots
    free: Vec<NodeIndex>,
    index: HashMap<String, NodeIndex>,
    head: NodeIndex,
    tail: NodeIndex,
    capacity: usize,
}

impl EvictionList {
    // == Constructor ==
    /// Creates an empty list holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "eviction list needs room for one entry");
        Self {
            arena: Vec::with_capacity(capacity),
            free: Vec::new(),
            index: HashMap::with_capacity(capacity),
            head: NIL,
            tail: NIL,
            capacity,
        }
    }

    // == Upsert ==
    /// Inserts `key` as the newest entry, replacing any previous node for it.
    ///
    /// Returns the evicted entry when the insertion pushed the list past
    /// capacity.
    pub fn upsert(&mut self, key: String, value: i64) -> Option<Entry> {
        self.remove(&key);

        let idx = self.alloc(Node {
            entry: Entry {
                key: key.clone(),
                value,
            },
            prev: NIL,
            next: NIL,
        });
        self.index.insert(key, idx);
        self.push_tail(idx);

        if self.index.len() > self.capacity {
            self.pop_head()
        } else {
            None
        }
    }

    // == Remove ==
    /// Removes `key` if present. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        let idx = self.index.remove(key)?;
        self.unlink(idx);
        self.free.push(idx);
        Some(self.arena[idx].entry.clone())
    }

    // == Get ==
    /// Returns the value stored for `key` without touching its position.
    pub fn get(&self, key: &str) -> Option<i64> {
        self.index.get(key).map(|&idx| self.arena[idx].entry.value)
    }

    // == Contains ==
    /// Checks whether `key` is resident.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Oldest ==
    /// Returns the entry that would be evicted next.
    pub fn oldest(&self) -> Option<&Entry> {
        (self.head != NIL).then(|| &self.arena[self.head].entry)
    }

    /// Iterates entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            if cursor == NIL {
                return None;
            }
            let node = &self.arena[cursor];
            cursor = node.next;
            Some(&node.entry)
        })
    }

    /// Resident keys from oldest to newest.
    pub fn keys(&self) -> Vec<String> {
        self.iter().map(|e| e.key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Arena and Link Management ==

    fn alloc(&mut self, node: Node) -> NodeIndex {
        if let Some(idx) = self.free.pop() {
            self.arena[idx] = node;
            idx
        } else {
            self.arena.push(node);
            self.arena.len() - 1
        }
    }

    fn push_tail(&mut self, idx: NodeIndex) {
        self.arena[idx].prev = self.tail;
        self.arena[idx].next = NIL;

        if self.tail != NIL {
            self.arena[self.tail].next = idx;
        }
        self.tail = idx;

        if self.head == NIL {
            self.head = idx;
        }
    }

    fn unlink(&mut self, idx: NodeIndex) {
        let prev = self.arena[idx].prev;
        let next = self.arena[idx].next;

        if prev != NIL {
            self.arena[prev].next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            self.arena[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.arena[idx].prev = NIL;
        self.arena[idx].next = NIL;
    }

    fn pop_head(&mut self) -> Option<Entry> {
        if self.head == NIL {
            return None;
        }
        let key = self.arena[self.head].entry.key.clone();
        self.remove(&key)
    }
}
