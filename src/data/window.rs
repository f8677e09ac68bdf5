//! Bounded, de-duplicating, insertion-ordered window of integers.
//!
//! `BoundedWindow` is the data structure behind every per-kind window. It is a
//! FIFO queue with a hard capacity:
//!
//! ```text
//!   front (oldest)                      back (newest)
//!   [ 2 | 3 | 5 | 7 ]  <- push(11), capacity 4
//!   [ 3 | 5 | 7 | 11 ]    evicted: 2
//! ```
//!
//! Pushing a value that is already in the window is a no-op: the value is not
//! appended again and existing elements keep their position. Membership is
//! checked against the current contents only, so a value that has been evicted
//! can be appended again later.

use crate::error::{AppResult, AverageError};
use std::collections::VecDeque;

/// Result of a single [`BoundedWindow::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Value was already present; window unchanged.
    Duplicate,
    /// Value appended without eviction.
    Appended,
    /// Value appended and the oldest element was evicted to stay in capacity.
    AppendedWithEviction(i64),
}

/// Fixed-capacity FIFO window with no duplicate values.
#[derive(Debug, Clone)]
pub struct BoundedWindow {
    values: VecDeque<i64>,
    capacity: usize,
}

impl BoundedWindow {
    /// Create an empty window. Capacity must be at least 1.
    pub fn new(capacity: usize) -> AppResult<Self> {
        check_capacity(capacity)?;
        Ok(Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Maximum number of values the window holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the window holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when `value` is currently in the window.
    pub fn contains(&self, value: i64) -> bool {
        self.values.contains(&value)
    }

    /// Change the capacity, evicting from the front until the window fits.
    ///
    /// Returns the evicted values, oldest first.
    pub fn set_capacity(&mut self, capacity: usize) -> AppResult<Vec<i64>> {
        check_capacity(capacity)?;
        self.capacity = capacity;
        let mut evicted = Vec::new();
        while self.values.len() > self.capacity {
            if let Some(oldest) = self.values.pop_front() {
                evicted.push(oldest);
            }
        }
        Ok(evicted)
    }

    /// Append `value` unless it is already present, evicting the oldest value
    /// when the window would exceed its capacity.
    pub fn push(&mut self, value: i64) -> PushOutcome {
        if self.contains(value) {
            return PushOutcome::Duplicate;
        }
        self.values.push_back(value);
        if self.values.len() > self.capacity {
            match self.values.pop_front() {
                Some(evicted) => PushOutcome::AppendedWithEviction(evicted),
                None => PushOutcome::Appended,
            }
        } else {
            PushOutcome::Appended
        }
    }

    /// Owned copy of the contents, oldest first.
    pub fn snapshot(&self) -> Vec<i64> {
        self.values.iter().copied().collect()
    }

    /// Arithmetic mean rounded to two decimal places, or 0.0 when empty.
    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let sum: i128 = self.values.iter().map(|&v| i128::from(v)).sum();
        round_to_hundredths(sum as f64 / self.values.len() as f64)
    }
}

/// Round to two decimal places, halves away from zero.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn check_capacity(capacity: usize) -> AppResult<()> {
    if capacity == 0 {
        return Err(AverageError::InvalidWindowSize(
            "window capacity must be at least 1".to_string(),
        ));
    }
    Ok(())
}
