//! Recent-answer history.

use std::collections::VecDeque;

/// Number of answers kept.
pub const HISTORY_CAPACITY: usize = 3;

/// The most recent results, newest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnswerHistory {
    entries: VecDeque<f64>,
}

impl AnswerHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    /// Record a new result, evicting the oldest one when full.
    pub fn push(&mut self, value: f64) {
        self.entries.push_front(value);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Get the `index`-th most recent result (0 is the newest).
    pub fn get(&self, index: usize) -> Option<f64> {
        self.entries.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().copied()
    }

    /// All slots, with 0.0 standing in for missing entries.
    pub fn slots(&self) -> [f64; HISTORY_CAPACITY] {
        std::array::from_fn(|i| self.get(i).unwrap_or(0.0))
    }
}
