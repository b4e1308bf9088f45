//! Bounded entry store.
//!
//! Holds the most recent log entries in arrival order with strict FIFO
//! eviction once the configured capacity is reached.

use crate::model::LogEntry;
use std::collections::{BTreeSet, VecDeque};
use std::rc::Rc;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

/// Default number of retained entries.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Ring buffer of log entries.
///
/// Entries are shared (`Rc`) so snapshots and filtered views are cheap; an
/// entry is immutable once stored, so sharing never exposes later mutation.
#[derive(Debug)]
pub struct EntryStore {
    /// Oldest at front, newest at back
    entries: VecDeque<Rc<LogEntry>>,
    /// Maximum entries to retain
    capacity: usize,
}

impl EntryStore {
    /// Create a store retaining at most `capacity` entries.
    ///
    /// A capacity of zero keeps nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest one when over capacity.
    ///
    /// Returns the evicted entry, if any.
    pub fn add_entry(&mut self, entry: impl Into<Rc<LogEntry>>) -> Option<Rc<LogEntry>> {
        if self.capacity == 0 {
            return None;
        }
        self.entries.push_back(entry.into());
        if self.entries.len() > self.capacity {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Independent snapshot of every entry, oldest first.
    pub fn all_entries(&self) -> Vec<Rc<LogEntry>> {
        self.entries.iter().cloned().collect()
    }

    /// Borrowing iterator, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<LogEntry>> {
        self.entries.iter()
    }

    /// Distinct source ids currently present.
    pub fn sources(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .map(|entry| entry.source_id().to_string())
            .collect()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Current number of entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
