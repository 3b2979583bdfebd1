//! Fixed-capacity history shared by pity and reroll tracking
//!
//! Serialized as a plain list (oldest first). The cap is re-applied on load so
//! an oversized save keeps only its newest `N` entries.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Ordered ring buffer that evicts the oldest entry once full
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<T>", into = "Vec<T>")]
#[serde(bound(serialize = "T: Serialize + Clone", deserialize = "T: Deserialize<'de>"))]
pub struct BoundedHistory<T, const N: usize> {
    entries: VecDeque<T>,
}

impl<T, const N: usize> Default for BoundedHistory<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> BoundedHistory<T, N> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(N),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Append a new entry, returning the evicted oldest one if over capacity
    pub fn append(&mut self, entry: T) -> Option<T> {
        self.entries.push_back(entry);
        if self.entries.len() > N {
            self.entries.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn oldest(&self) -> Option<&T> {
        self.entries.front()
    }

    pub fn newest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }

    /// Newest first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &T> {
        self.entries.iter().rev().take(count)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T, const N: usize> From<Vec<T>> for BoundedHistory<T, N> {
    fn from(entries: Vec<T>) -> Self {
        let mut entries: VecDeque<T> = entries.into();
        while entries.len() > N {
            entries.pop_front();
        }
        Self { entries }
    }
}

impl<T, const N: usize> From<BoundedHistory<T, N>> for Vec<T> {
    fn from(history: BoundedHistory<T, N>) -> Self {
        history.entries.into()
    }
}
