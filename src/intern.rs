// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
//! C3: intern pool (spec.md §3 "Pool", §4.3).
//!
//! Dedupes value-equal collections (item-sets, in this generator) to stable
//! small integer IDs, assigned in first-seen order starting at 0.

use std::collections::BTreeMap;

/// `intern` reports whether the value was newly allocated (`true`) or already
/// present (`false`). Callers that must classify "new to the pool" against a
/// snapshot taken *before* the intern call (spec.md §4.5, §9 "pool-vs-new
/// test") should capture this flag rather than re-querying the pool
/// afterwards — `present(id)` alone cannot distinguish the two once the
/// value has been inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternResult {
    pub id: u32,
    pub was_new: bool,
}

#[derive(Debug, Clone)]
pub struct Pool<V: Ord + Clone> {
    by_value: BTreeMap<V, u32>,
    by_id: Vec<V>,
}

impl<V: Ord + Clone> Default for Pool<V> {
    fn default() -> Self {
        Self {
            by_value: BTreeMap::new(),
            by_id: Vec::new(),
        }
    }
}

impl<V: Ord + Clone> Pool<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the existing id if `value` already equals some pool member,
    /// otherwise allocates the next integer id.
    pub fn intern(&mut self, value: V) -> InternResult {
        if let Some(&id) = self.by_value.get(&value) {
            return InternResult { id, was_new: false };
        }
        let id = self.by_id.len() as u32;
        self.by_id.push(value.clone());
        self.by_value.insert(value, id);
        InternResult { id, was_new: true }
    }

    /// Whether `id` has been allocated by this pool instance at the time of
    /// the check.
    pub fn present(&self, id: u32) -> bool {
        (id as usize) < self.by_id.len()
    }

    pub fn value_of(&self, id: u32) -> Option<&V> {
        self.by_id.get(id as usize)
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> {
        0..(self.by_id.len() as u32)
    }

    pub fn entries(&self) -> impl Iterator<Item = (u32, &V)> {
        self.by_id.iter().enumerate().map(|(i, v)| (i as u32, v))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
