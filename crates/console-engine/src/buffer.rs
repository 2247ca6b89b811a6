//! Bounded log buffer
//!
//! Fixed-capacity, append-only line storage. When full, the oldest lines are
//! evicted first; relative order is never changed.

use crate::error::ConsoleError;
use crate::line::LogLine;
use std::collections::VecDeque;

/// Capacity used before a session has been opened with an explicit one
pub const DEFAULT_CAPACITY: usize = 1000;

/// Upper bound for the up-front allocation, large capacities grow lazily
const MAX_PREALLOCATED: usize = 10_000;

/// Append-only sequence with oldest-first eviction
#[derive(Debug, Clone)]
pub struct BoundedLogBuffer<T = LogLine> {
    lines: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedLogBuffer<T> {
    /// Create an empty buffer holding at most `capacity` lines
    pub fn new(capacity: usize) -> Result<Self, ConsoleError> {
        if capacity == 0 {
            return Err(ConsoleError::InvalidCapacity(capacity));
        }

        Ok(Self {
            lines: VecDeque::with_capacity(capacity.min(MAX_PREALLOCATED)),
            capacity,
        })
    }

    /// Append one line, evicting the oldest if full.
    ///
    /// Returns the number of evicted lines (0 or 1).
    pub fn append(&mut self, line: T) -> usize {
        let evicted = if self.lines.len() == self.capacity {
            self.lines.pop_front();
            1
        } else {
            0
        };
        self.lines.push_back(line);
        evicted
    }

    /// Append lines in order, same result as repeated [`Self::append`].
    ///
    /// Returns the total number of evicted lines.
    pub fn append_batch<I>(&mut self, lines: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        lines.into_iter().map(|line| self.append(line)).sum()
    }

    /// Drop all lines (local view reset only)
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines oldest to newest
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.lines.iter()
    }

    /// Line at `index`, 0 being the oldest retained line
    pub fn get(&self, index: usize) -> Option<&T> {
        self.lines.get(index)
    }

    /// Most recently appended line
    pub fn last(&self) -> Option<&T> {
        self.lines.back()
    }
}

impl<T: Clone> BoundedLogBuffer<T> {
    /// Owned copy of the current lines, oldest first
    pub fn snapshot(&self) -> Vec<T> {
        self.lines.iter().cloned().collect()
    }
}

impl<T> Default for BoundedLogBuffer<T> {
    fn default() -> Self {
        Self {
            lines: VecDeque::with_capacity(DEFAULT_CAPACITY),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl<'a, T> IntoIterator for &'a BoundedLogBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
