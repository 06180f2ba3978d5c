//! History API
//!
//! Session history entries behind window.history.

use serde_json::Value;

/// History entry
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
    pub state: Value,
}

/// History manager
#[derive(Debug)]
pub struct HistoryManager {
    entries: Vec<HistoryEntry>,
}

impl HistoryManager {
    pub fn new(initial_url: &str) -> Self {
        Self {
            entries: vec![HistoryEntry {
                url: initial_url.to_string(),
                title: String::new(),
                state: Value::Null,
            }],
        }
    }

    /// Push a new state
    pub fn push_state(&mut self, state: Value, title: String, url: String) {
        self.entries.push(HistoryEntry { url, title, state });
    }

    /// Replace current state
    pub fn replace_state(&mut self, state: Value, title: String, url: String) {
        let entry = HistoryEntry { url, title, state };
        match self.entries.last_mut() {
            Some(current) => *current = entry,
            None => self.entries.push(entry),
        }
    }

    /// History length
    pub fn length(&self) -> usize {
        self.entries.len()
    }
}
