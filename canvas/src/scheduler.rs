//! Deterministic task scheduler polled by the frame driver.
//!
//! Holds at most one `(next_due, key)` entry per key. The driver calls
//! [`Scheduler::drain_due`] with the current clock reading and runs whatever
//! comes back; nothing here reads a clock or sleeps, so tests drive time by
//! hand. Times are seconds on the host's monotonic clock.

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

use std::hash::Hash;

use indexmap::IndexMap;

/// Pending keyed tasks ordered by due time.
#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    /// Insertion order breaks ties between equal due times.
    entries: IndexMap<K, f64>,
}

impl<K: Copy + Eq + Hash> Scheduler<K> {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: IndexMap::new() }
    }

    /// Schedule `key` at `due`, replacing any pending entry for the same key.
    pub fn schedule(&mut self, key: K, due: f64) {
        self.entries.shift_remove(&key);
        self.entries.insert(key, due);
    }

    /// Drop the pending entry for `key`. Returns whether one existed.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    #[must_use]
    pub fn is_scheduled(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Earliest pending due time.
    #[must_use]
    pub fn next_due(&self) -> Option<f64> {
        self.entries.values().copied().reduce(f64::min)
    }

    /// Remove and return every key due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: f64) -> Vec<K> {
        let mut due: Vec<(K, f64)> =
            self.entries.iter().filter(|(_, at)| **at <= now).map(|(k, at)| (*k, *at)).collect();
        due.sort_by(|a, b| a.1.total_cmp(&b.1));
        for (key, _) in &due {
            self.entries.shift_remove(key);
        }
        due.into_iter().map(|(key, _)| key).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Copy + Eq + Hash> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}
