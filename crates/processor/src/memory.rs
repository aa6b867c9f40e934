//! Fixed-capacity FIFO windows
//!
//! [`Memory`] is the sliding window every stateful algorithm owns: a ring of
//! fixed capacity where pushing into a full window evicts the oldest element.
//! [`MemoryProvider`] is the factory a compiled processor uses to allocate
//! its windows at a configured capacity.
//!
//! # Example
//!
//! ```rust
//! use octopus_processor::memory::Memory;
//!
//! let mut window: Memory<f64> = Memory::new(2);
//! window.push(1.0);
//! window.push(2.0);
//! assert!(window.is_full());
//!
//! // Third push evicts the oldest sample.
//! assert_eq!(window.push(3.0), Some(1.0));
//! assert_eq!(window.get(0), Some(&2.0));
//! assert_eq!(window.latest(), Some(&3.0));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A fixed-capacity FIFO window over values of type `T`.
///
/// Index 0 is the oldest element; `len() - 1` is the newest. Capacity is at
/// least 1 regardless of what was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory<T> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T> Memory<T> {
    /// Creates an empty window holding at most `capacity` elements.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a value, returning the evicted oldest element when the window
    /// was already full.
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.values.len() == self.capacity {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        evicted
    }

    /// Element at `index`, oldest first.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.values.get(index)
    }

    /// Newest element.
    pub fn latest(&self) -> Option<&T> {
        self.values.back()
    }

    /// Oldest element.
    pub fn oldest(&self) -> Option<&T> {
        self.values.front()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True once `capacity` values have been pushed.
    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    /// Drops all contents; capacity is unchanged.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }
}

impl<T: Clone> Memory<T> {
    /// Snapshot of the current contents, oldest first. Later pushes do not
    /// affect a snapshot already taken.
    pub fn values(&self) -> Vec<T> {
        self.values.iter().cloned().collect()
    }
}

/// Factory for windows of a configured capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryProvider {
    capacity: usize,
}

impl MemoryProvider {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Allocates a fresh, empty window.
    pub fn provide<T>(&self) -> Memory<T> {
        Memory::new(self.capacity)
    }
}
