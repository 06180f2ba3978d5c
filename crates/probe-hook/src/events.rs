//! Event listener storage
//!
//! Listeners registered through the page's addEventListener, keyed by
//! target and event type.

use std::collections::HashMap;

use probe_dom::NodeId;

use crate::value::JsValue;

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Node(NodeId),
}

/// Event listener storage
#[derive(Default)]
pub struct EventListenerRegistry {
    /// Map of target -> event type -> callbacks
    listeners: HashMap<EventTarget, HashMap<String, Vec<JsValue>>>,
}

impl EventListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event listener.
    ///
    /// Registering the same function twice for one target and type is a
    /// no-op.
    pub fn add_listener(&mut self, target: EventTarget, event_type: &str, callback: JsValue) {
        let entries = self
            .listeners
            .entry(target)
            .or_default()
            .entry(event_type.to_string())
            .or_default();

        if !entries.contains(&callback) {
            entries.push(callback);
        }
    }

    /// Callbacks for a target and event type, in registration order
    pub fn get_listeners(&self, target: EventTarget, event_type: &str) -> Vec<JsValue> {
        self.listeners
            .get(&target)
            .and_then(|node| node.get(event_type))
            .cloned()
            .unwrap_or_default()
    }
}
