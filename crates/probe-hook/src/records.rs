//! Observation records and the append-only logs that hold them

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use probe_path::ElementDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// API that produced a navigation record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavigationSource {
    #[serde(rename = "history.pushState")]
    PushState,
    #[serde(rename = "history.replaceState")]
    ReplaceState,
    #[serde(rename = "window.open")]
    WindowOpen,
    #[serde(rename = "hashchange")]
    HashChange,
    #[serde(rename = "websocket")]
    WebSocket,
    #[serde(rename = "eventsource")]
    EventSource,
    #[serde(rename = "fetch")]
    Fetch,
}

impl NavigationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PushState => "history.pushState",
            Self::ReplaceState => "history.replaceState",
            Self::WindowOpen => "window.open",
            Self::HashChange => "hashchange",
            Self::WebSocket => "websocket",
            Self::EventSource => "eventsource",
            Self::Fetch => "fetch",
        }
    }
}

impl fmt::Display for NavigationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A URL the page tried to reach. `url` is `None` when the page passed none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEvent {
    pub url: Option<String>,
    pub source: NavigationSource,
}

impl NavigationEvent {
    pub fn new(url: Option<String>, source: NavigationSource) -> Self {
        Self { url, source }
    }
}

/// One addEventListener call on an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventListenerRecord {
    pub element: ElementDescriptor,
    #[serde(rename = "type")]
    pub event_type: String,
    /// Source text of the listener
    pub listener: String,
    pub options: Value,
}

/// Append-only, shared log. Clones append to the same storage.
#[derive(Debug)]
pub struct Log<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for Log<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for Log<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: Clone> Log<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<T>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, entry: T) {
        self.entries().push(entry);
    }

    /// Copy of the entries in append order
    pub fn snapshot(&self) -> Vec<T> {
        self.entries().clone()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub(crate) fn clear(&self) {
        self.entries().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_shared_between_clones() {
        let log = Log::new();
        let writer = log.clone();
        writer.push(NavigationEvent::new(Some("/a".into()), NavigationSource::Fetch));
        writer.push(NavigationEvent::new(None, NavigationSource::WindowOpen));

        let entries = log.snapshot();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url.as_deref(), Some("/a"));
        assert_eq!(entries[1].source, NavigationSource::WindowOpen);

        log.clear();
        assert!(writer.is_empty());
    }

    #[test]
    fn test_navigation_event_json() {
        let event = NavigationEvent::new(Some("/next".into()), NavigationSource::PushState);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({"url": "/next", "source": "history.pushState"}));

        let event = NavigationEvent::new(None, NavigationSource::HashChange);
        assert_eq!(serde_json::to_string(&event).unwrap(), r#"{"url":null,"source":"hashchange"}"#);
    }
}
