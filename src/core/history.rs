use std::{
    collections::VecDeque,
    path::PathBuf,
};

use crate::persistence::write_text_best_effort;

pub const DEFAULT_HISTORY_CAPACITY: usize = 4;
pub const HISTORY_SEPARATOR: &str = " - ";
pub const HISTORY_FILE: &str = "last_chords.txt";

/// Recently shown chord names, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryBuffer {
    names: VecDeque<String>,
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { names: VecDeque::with_capacity(capacity + 1), capacity }
    }

    pub fn append(&mut self, name: impl Into<String>) {
        self.names.push_back(name.into());

        while self.names.len() > self.capacity {
            self.names.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// Negative offsets count from the end: `-1` is the newest entry.
    pub fn get(&self, offset: isize) -> Option<&str> {
        let len = self.names.len() as isize;
        let index = if offset < 0 { len + offset } else { offset };
        if index < 0 || index >= len {
            return None;
        }
        self.names.get(index as usize).map(String::as_str)
    }

    pub fn latest(&self) -> Option<&str> {
        self.names.back().map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        let key = super::models::normalize_name(name);
        self.names.iter().any(|n| super::models::normalize_name(n) == key)
    }

    pub fn joined(&self) -> String {
        self.names.iter().map(String::as_str).collect::<Vec<_>>().join(HISTORY_SEPARATOR)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Receives the full history after every append.
pub trait HistorySink {
    fn write(&mut self, history: &HistoryBuffer);
}

/// Mirrors the history to a text file. Never read back.
#[derive(Debug, Clone)]
pub struct FileHistorySink {
    path: PathBuf,
}

impl FileHistorySink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_app_data_dir() -> Self {
        Self::new(crate::persistence::get_data_file_path(HISTORY_FILE))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl HistorySink for FileHistorySink {
    fn write(&mut self, history: &HistoryBuffer) {
        write_text_best_effort(&self.path, &history.joined());
    }
}

/// Discards everything. Used when no mirror file is wanted.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl HistorySink for NullSink {
    fn write(&mut self, _history: &HistoryBuffer) {}
}

#[cfg(test)]
mod tests {
    use std::fs;

    use proptest::prelude::*;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_oldest_entry_is_evicted_first() {
        let mut history = HistoryBuffer::new(3);
        for name in ["A", "B", "C", "D"] {
            history.append(name);
        }

        assert_eq!(history.names().collect::<Vec<_>>(), vec!["B", "C", "D"]);
        assert_eq!(history.joined(), "B - C - D");
    }

    #[test]
    fn test_negative_offsets() {
        let mut history = HistoryBuffer::default();
        for name in ["A", "B", "C"] {
            history.append(name);
        }

        assert_eq!(history.get(-1), Some("C"));
        assert_eq!(history.get(-3), Some("A"));
        assert_eq!(history.get(-4), None);
        assert_eq!(history.get(0), Some("A"));
        assert_eq!(history.latest(), Some("C"));
    }

    #[test]
    fn test_contains_ignores_case() {
        let mut history = HistoryBuffer::default();
        history.append("Am7");
        assert!(history.contains(" am7"));
        assert!(!history.contains("Am"));
    }

    #[test]
    fn test_file_sink_overwrites_previous_content() {
        let dir = tempdir().unwrap();
        let mut sink = FileHistorySink::new(dir.path().join(HISTORY_FILE));
        let mut history = HistoryBuffer::default();

        history.append("C");
        sink.write(&history);
        history.append("G");
        sink.write(&history);

        assert_eq!(fs::read_to_string(sink.path()).unwrap(), "C - G");
    }

    #[test]
    fn test_file_sink_write_failure_is_not_fatal() {
        let dir = tempdir().unwrap();
        let mut sink = FileHistorySink::new(dir.path().join("no_such_dir").join(HISTORY_FILE));
        let mut history = HistoryBuffer::default();
        history.append("C");

        sink.write(&history);
        assert_eq!(history.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_capacity(capacity in 1usize..8, names in prop::collection::vec("[A-G]{1,3}", 0..40)) {
            let mut history = HistoryBuffer::new(capacity);
            for (i, name) in names.iter().enumerate() {
                history.append(name.clone());
                prop_assert!(history.len() <= capacity);
                prop_assert_eq!(history.latest(), Some(name.as_str()));
                let expected_len = (i + 1).min(capacity);
                prop_assert_eq!(history.len(), expected_len);
            }
            let tail: Vec<&str> = names.iter().rev().take(capacity).rev().map(String::as_str).collect();
            prop_assert_eq!(history.names().collect::<Vec<_>>(), tail);
        }
    }
}
