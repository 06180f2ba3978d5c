//! Page - a loaded, instrumented document

use std::sync::PoisonError;

use probe_hook::{
    EventListenerRecord, ExecutionEnvironment, InstrumentationHub, NavigationEvent, PageHost,
};
use probe_path::collect::{self, ElementListeners, FormDescriptor};
use serde::Serialize;

/// Everything observed on a page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub url: String,
    pub navigated_links: Vec<NavigationEvent>,
    pub event_listeners: Vec<EventListenerRecord>,
    pub forms: Vec<FormDescriptor>,
    pub inline_listeners: Vec<ElementListeners>,
}

/// A loaded page
pub struct Page {
    host: PageHost,
    hub: InstrumentationHub,
}

impl Page {
    pub(crate) fn new(host: PageHost, hub: InstrumentationHub) -> Self {
        Self { host, hub }
    }

    /// Current page URL
    pub fn url(&self) -> String {
        self.host.location_href()
    }

    /// The instrumented environment; page script runs against this
    pub fn host(&self) -> &PageHost {
        &self.host
    }

    pub fn hub(&self) -> &InstrumentationHub {
        &self.hub
    }

    /// Fire due timers
    pub fn run_timers(&self) -> usize {
        self.host.run_timers()
    }

    /// Snapshot the logs and scan the document for forms and inline handlers
    pub fn report(&self) -> PageReport {
        let document = self.host.document();
        let document = document.lock().unwrap_or_else(PoisonError::into_inner);
        let root = document.node(document.root());

        PageReport {
            url: self.url(),
            navigated_links: self.hub.navigated_links(),
            event_listeners: self.hub.event_listeners(),
            forms: collect::get_all_forms(&root),
            inline_listeners: collect::get_all_elements_with_event_listeners(&root),
        }
    }
}
