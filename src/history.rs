//! Bounded history of submitted SQL queries.

use std::collections::VecDeque;

/// Maximum number of queries retained.
pub const HISTORY_CAPACITY: usize = 10;

/// FIFO ring of the most recently submitted query strings, most-recent-last.
///
/// Every submission is recorded, including queries that are later rejected
/// by the SELECT-only check or that fail in the engine.
#[derive(Debug, Default)]
pub struct QueryHistory {
    entries: VecDeque<String>,
}

impl QueryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a query, evicting the oldest entry when at capacity.
    pub fn push(&mut self, query: impl Into<String>) {
        self.entries.push_back(query.into());
        if self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in submission order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::{QueryHistory, HISTORY_CAPACITY};

    #[test]
    fn push_keeps_submission_order() {
        let mut history = QueryHistory::new();
        history.push("select 1");
        history.push("select 2");
        let entries: Vec<&str> = history.iter().collect();
        assert_eq!(entries, vec!["select 1", "select 2"]);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut history = QueryHistory::new();
        for i in 0..HISTORY_CAPACITY + 1 {
            history.push(format!("select {i}"));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        let entries: Vec<&str> = history.iter().collect();
        assert_eq!(entries[0], "select 1");
        assert_eq!(entries[HISTORY_CAPACITY - 1], "select 10");
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut history = QueryHistory::new();
        for i in 0..100 {
            history.push(format!("q{i}"));
            assert!(history.len() <= HISTORY_CAPACITY);
        }
    }
}
