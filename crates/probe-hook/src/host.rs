//! Page host
//!
//! [`ExecutionEnvironment`] is what the hub needs from the page it
//! instruments. [`PageHost`] is a self-contained implementation with
//! un-hooked browser behaviour behind every member the hub patches.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use probe_dom::{Document, NodeId};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::events::{EventListenerRegistry, EventTarget};
use crate::history::HistoryManager;
use crate::location::LocationManager;
use crate::surface::{Capability, Surface};
use crate::timers::{Clock, TimerManager};
use crate::value::{HandleKind, HostHandle, JsFunction, JsValue};
use crate::JsError;

/// The page an [`InstrumentationHub`](crate::InstrumentationHub) installs into
pub trait ExecutionEnvironment {
    /// Global bindings and prototypes
    fn surface(&self) -> &Surface;

    /// The page document
    fn document(&self) -> Arc<Mutex<Document>>;

    /// `window.location`
    fn location(&self) -> Arc<Mutex<LocationManager>>;
}

/// Lock a mutex, recovering the data if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A WebSocket or EventSource opened by the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub kind: HandleKind,
    pub url: String,
}

struct HostState {
    surface: Surface,
    document: Arc<Mutex<Document>>,
    location: Arc<Mutex<LocationManager>>,
    history: Mutex<HistoryManager>,
    timers: Mutex<TimerManager>,
    listeners: Mutex<EventListenerRegistry>,
    opened_windows: Mutex<Vec<String>>,
    connections: Mutex<Vec<Connection>>,
    requests: Mutex<Vec<String>>,
    next_handle: AtomicU32,
    closed: AtomicBool,
}

impl HostState {
    fn handle(&self, kind: HandleKind) -> JsValue {
        JsValue::Handle(HostHandle {
            kind,
            id: self.next_handle.fetch_add(1, Ordering::Relaxed),
        })
    }

    /// Apply a history entry: resolve the URL and move the location
    fn history_entry(&self, args: &[JsValue], replace: bool) -> Result<(), JsError> {
        let method = if replace { "replaceState" } else { "pushState" };
        let state = args.first().map(JsValue::to_json).unwrap_or(Value::Null);
        let title = args
            .get(1)
            .filter(|v| !v.is_nullish())
            .map(JsValue::to_display_string)
            .unwrap_or_default();

        let mut location = lock(&self.location);
        let url = match args.get(2).and_then(JsValue::to_url_arg) {
            Some(url) => location
                .resolve(&url)
                .map_err(|e| JsError::Runtime(format!("Failed to execute '{method}': {e}")))?
                .to_string(),
            None => location.href(),
        };
        location.set_href(&url).map_err(|e| JsError::Runtime(e.to_string()))?;
        drop(location);

        let mut history = lock(&self.history);
        if replace {
            history.replace_state(state, title, url);
        } else {
            history.push_state(state, title, url);
        }
        Ok(())
    }

    fn open_connection(
        &self,
        kind: HandleKind,
        name: &str,
        args: &[JsValue],
    ) -> Result<JsValue, JsError> {
        let url = args.first().and_then(JsValue::to_url_arg).ok_or_else(|| {
            JsError::TypeError(format!("Failed to construct '{name}': 1 argument required"))
        })?;
        lock(&self.connections).push(Connection { kind, url });
        Ok(self.handle(kind))
    }

    fn schedule(&self, args: &[JsValue], repeat: bool) -> JsValue {
        let callback = args.first().cloned().unwrap_or(JsValue::Undefined);
        let delay = args.get(1).map(JsValue::to_number).unwrap_or(0.0);
        let extra = args.get(2..).map(<[JsValue]>::to_vec).unwrap_or_default();
        let mut timers = lock(&self.timers);
        let id = if repeat {
            timers.set_interval(callback, delay, extra)
        } else {
            timers.set_timeout(callback, delay, extra)
        };
        JsValue::Number(f64::from(id))
    }

    fn clear_timer(&self, args: &[JsValue]) -> JsValue {
        if let Some(id) = args.first().and_then(JsValue::as_number) {
            if id >= 0.0 && id <= f64::from(u32::MAX) {
                lock(&self.timers).clear(id as u32);
            }
        }
        JsValue::Undefined
    }

    fn add_listener(&self, target: EventTarget, args: &[JsValue]) {
        let event_type = args.first().map(JsValue::to_display_string).unwrap_or_default();
        match args.get(1) {
            Some(callback) if !callback.is_nullish() => {
                lock(&self.listeners).add_listener(target, &event_type, callback.clone());
            }
            _ => {}
        }
    }

    /// Restore every control of the form to its default value
    fn reset_form(&self, form: NodeId) -> Result<(), JsError> {
        let mut document = lock(&self.document);
        let is_form = document
            .tree
            .get(form)
            .and_then(|n| n.as_element())
            .is_some_and(|e| e.local_name == "form");
        if !is_form {
            return Err(JsError::TypeError("Illegal invocation".into()));
        }

        let controls: Vec<NodeId> = document
            .tree
            .descendants(form)
            .filter(|(_, node)| node.as_element().is_some_and(|e| e.is_form_control()))
            .map(|(id, _)| id)
            .collect();
        for id in controls {
            document.tree.reset_value(id);
        }
        Ok(())
    }
}

/// Wrap a host operation as a native function that holds a weak reference
/// back to the host.
fn native<F>(state: &Weak<HostState>, name: &str, op: F) -> JsValue
where
    F: Fn(&HostState, &JsValue, &[JsValue]) -> Result<JsValue, JsError> + Send + Sync + 'static,
{
    let state = state.clone();
    JsValue::Function(JsFunction::native(name, move |this, args| {
        let state = state
            .upgrade()
            .ok_or_else(|| JsError::Runtime("page has been discarded".into()))?;
        op(&state, this, args)
    }))
}

fn this_node(this: &JsValue) -> Result<NodeId, JsError> {
    this.as_node()
        .ok_or_else(|| JsError::TypeError("Illegal invocation".into()))
}

fn install_natives(surface: &Surface, state: &Weak<HostState>) -> Result<(), JsError> {
    use Capability::*;

    surface.define(
        History,
        "pushState",
        native(state, "pushState", |s, _, args| {
            s.history_entry(args, false)?;
            Ok(JsValue::Undefined)
        }),
    )?;
    surface.define(
        History,
        "replaceState",
        native(state, "replaceState", |s, _, args| {
            s.history_entry(args, true)?;
            Ok(JsValue::Undefined)
        }),
    )?;

    surface.define(
        Window,
        "open",
        native(state, "open", |s, _, args| {
            let url = args
                .first()
                .and_then(JsValue::to_url_arg)
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| "about:blank".into());
            lock(&s.opened_windows).push(url);
            Ok(s.handle(HandleKind::Window))
        }),
    )?;
    surface.define(
        Window,
        "close",
        native(state, "close", |s, _, _| {
            s.closed.store(true, Ordering::SeqCst);
            Ok(JsValue::Undefined)
        }),
    )?;

    surface.define(
        Window,
        "WebSocket",
        native(state, "WebSocket", |s, _, args| {
            s.open_connection(HandleKind::WebSocket, "WebSocket", args)
        }),
    )?;
    surface.define(
        Window,
        "EventSource",
        native(state, "EventSource", |s, _, args| {
            s.open_connection(HandleKind::EventSource, "EventSource", args)
        }),
    )?;
    surface.define(
        Window,
        "fetch",
        native(state, "fetch", |s, _, args| {
            let url = args.first().and_then(JsValue::to_url_arg).ok_or_else(|| {
                JsError::TypeError("Failed to execute 'fetch': 1 argument required".into())
            })?;
            lock(&s.requests).push(url);
            Ok(s.handle(HandleKind::Response))
        }),
    )?;

    surface.define(
        Window,
        "setTimeout",
        native(state, "setTimeout", |s, _, args| Ok(s.schedule(args, false))),
    )?;
    surface.define(
        Window,
        "setInterval",
        native(state, "setInterval", |s, _, args| Ok(s.schedule(args, true))),
    )?;
    surface.define(
        Window,
        "clearTimeout",
        native(state, "clearTimeout", |s, _, args| Ok(s.clear_timer(args))),
    )?;
    surface.define(
        Window,
        "clearInterval",
        native(state, "clearInterval", |s, _, args| Ok(s.clear_timer(args))),
    )?;
    surface.define(
        Window,
        "addEventListener",
        native(state, "addEventListener", |s, _, args| {
            s.add_listener(EventTarget::Window, args);
            Ok(JsValue::Undefined)
        }),
    )?;

    surface.define(
        HtmlFormElement,
        "reset",
        native(state, "reset", |s, this, _| {
            s.reset_form(this_node(this)?)?;
            Ok(JsValue::Undefined)
        }),
    )?;
    surface.define(
        Element,
        "addEventListener",
        native(state, "addEventListener", |s, this, args| {
            s.add_listener(EventTarget::Node(this_node(this)?), args);
            Ok(JsValue::Undefined)
        }),
    )?;

    Ok(())
}

/// Reference page environment
#[derive(Clone)]
pub struct PageHost {
    state: Arc<HostState>,
}

impl PageHost {
    /// Host `document` at its own URL, with timers driven by `clock`
    pub fn new(document: Document, clock: Arc<dyn Clock>) -> Result<Self, JsError> {
        let url = document.url().to_string();
        let location = LocationManager::new(&url)
            .map_err(|e| JsError::TypeError(format!("Invalid page URL '{url}': {e}")))?;

        let state = Arc::new(HostState {
            surface: Surface::new(),
            document: Arc::new(Mutex::new(document)),
            location: Arc::new(Mutex::new(location)),
            history: Mutex::new(HistoryManager::new(&url)),
            timers: Mutex::new(TimerManager::new(clock)),
            listeners: Mutex::new(EventListenerRegistry::new()),
            opened_windows: Mutex::new(Vec::new()),
            connections: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            next_handle: AtomicU32::new(1),
            closed: AtomicBool::new(false),
        });
        install_natives(&state.surface, &Arc::downgrade(&state))?;
        debug!("page host ready at {}", url);

        Ok(Self { state })
    }

    /// Call `owner.member` the way page script would
    pub fn call(
        &self,
        owner: Capability,
        member: &str,
        this: &JsValue,
        args: &[JsValue],
    ) -> Result<JsValue, JsError> {
        self.state.surface.call(owner, member, this, args)
    }

    /// Move to `#fragment` in place. Fires `hashchange` when the fragment
    /// actually changed and returns the number of listeners run.
    pub fn navigate_fragment(&self, fragment: &str) -> usize {
        let (old_url, new_url) = {
            let mut location = lock(&self.state.location);
            let old_url = location.href();
            location.set_hash(fragment);
            (old_url, location.href())
        };
        if old_url == new_url {
            return 0;
        }

        let mut event = Map::new();
        event.insert("type".into(), Value::from("hashchange"));
        event.insert("oldURL".into(), Value::from(old_url));
        event.insert("newURL".into(), Value::from(new_url));
        self.dispatch(EventTarget::Window, "hashchange", JsValue::Object(event))
    }

    /// Fire `event_type` at `target`; returns the number of listeners run
    pub fn dispatch_event(&self, target: EventTarget, event_type: &str) -> usize {
        let mut event = Map::new();
        event.insert("type".into(), Value::from(event_type));
        self.dispatch(target, event_type, JsValue::Object(event))
    }

    fn dispatch(&self, target: EventTarget, event_type: &str, event: JsValue) -> usize {
        // Snapshot first; listeners may register more listeners
        let callbacks = lock(&self.state.listeners).get_listeners(target, event_type);
        let this = match target {
            EventTarget::Window => JsValue::Undefined,
            EventTarget::Node(id) => JsValue::Node(id),
        };

        let mut ran = 0;
        for callback in callbacks {
            let Some(func) = callback.as_function() else {
                continue;
            };
            if let Err(e) = func.call(&this, std::slice::from_ref(&event)) {
                warn!("{} listener failed: {}", event_type, e);
            }
            ran += 1;
        }
        ran
    }

    /// Run every timer that is due; returns how many callbacks ran
    pub fn run_timers(&self) -> usize {
        let ready = lock(&self.state.timers).get_ready_timers();
        let mut ran = 0;
        for timer in ready {
            match &timer.callback {
                JsValue::Function(func) => {
                    if let Err(e) = func.call(&JsValue::Undefined, &timer.args) {
                        warn!("timer {} failed: {}", timer.id, e);
                    }
                    ran += 1;
                }
                other => debug!("timer {} has no callable body: {:?}", timer.id, other),
            }
        }
        ran
    }

    pub fn has_pending_timers(&self) -> bool {
        lock(&self.state.timers).has_pending()
    }

    /// Delay of a scheduled timer, after any scaling
    pub fn timer_delay(&self, id: u32) -> Option<f64> {
        lock(&self.state.timers).get(id).map(|t| t.delay_ms)
    }

    pub fn location_href(&self) -> String {
        lock(&self.state.location).href()
    }

    pub fn history_length(&self) -> usize {
        lock(&self.state.history).length()
    }

    pub fn opened_windows(&self) -> Vec<String> {
        lock(&self.state.opened_windows).clone()
    }

    pub fn connections(&self) -> Vec<Connection> {
        lock(&self.state.connections).clone()
    }

    pub fn requests(&self) -> Vec<String> {
        lock(&self.state.requests).clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }

    /// Listeners registered on `target` for `event_type`
    pub fn listener_count(&self, target: EventTarget, event_type: &str) -> usize {
        lock(&self.state.listeners).get_listeners(target, event_type).len()
    }
}

impl ExecutionEnvironment for PageHost {
    fn surface(&self) -> &Surface {
        &self.state.surface
    }

    fn document(&self) -> Arc<Mutex<Document>> {
        Arc::clone(&self.state.document)
    }

    fn location(&self) -> Arc<Mutex<LocationManager>> {
        Arc::clone(&self.state.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timers::ManualClock;

    fn host(html: &str, url: &str) -> (PageHost, ManualClock) {
        let document = probe_html::HtmlParser::new().parse_with_url(html, url).unwrap();
        let clock = ManualClock::new();
        let host = PageHost::new(document, Arc::new(clock.clone())).unwrap();
        (host, clock)
    }

    fn counter() -> (JsValue, Arc<AtomicU32>) {
        let hits = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&hits);
        let f = JsFunction::new("() => hits++", move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(JsValue::Undefined)
        });
        (JsValue::Function(f), hits)
    }

    #[test]
    fn test_push_state_moves_location() {
        let (host, _) = host("<p>x</p>", "https://example.com/a/b");
        host.call(
            Capability::History,
            "pushState",
            &JsValue::Undefined,
            &[JsValue::Null, JsValue::from(""), JsValue::from("c")],
        )
        .unwrap();
        assert_eq!(host.location_href(), "https://example.com/a/c");
        assert_eq!(host.history_length(), 2);

        host.call(
            Capability::History,
            "replaceState",
            &JsValue::Undefined,
            &[JsValue::Null, JsValue::from(""), JsValue::from("/d")],
        )
        .unwrap();
        assert_eq!(host.location_href(), "https://example.com/d");
        assert_eq!(host.history_length(), 2);
    }

    #[test]
    fn test_timers_fire_on_clock() {
        let (host, clock) = host("", "https://example.com/");
        let (cb, hits) = counter();
        host.call(
            Capability::Window,
            "setTimeout",
            &JsValue::Undefined,
            &[cb, JsValue::Number(50.0)],
        )
        .unwrap();

        clock.advance(49.0);
        assert_eq!(host.run_timers(), 0);
        clock.advance(1.0);
        assert_eq!(host.run_timers(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!host.has_pending_timers());
    }

    #[test]
    fn test_clear_interval() {
        let (host, clock) = host("", "https://example.com/");
        let (cb, hits) = counter();
        let id = host
            .call(
                Capability::Window,
                "setInterval",
                &JsValue::Undefined,
                &[cb, JsValue::Number(10.0)],
            )
            .unwrap();
        clock.advance(10.0);
        host.run_timers();
        clock.advance(10.0);
        host.run_timers();
        host.call(Capability::Window, "clearInterval", &JsValue::Undefined, &[id])
            .unwrap();
        clock.advance(10.0);
        host.run_timers();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_fragment_navigation_dispatches_hashchange() {
        let (host, _) = host("", "https://example.com/page");
        let (cb, hits) = counter();
        host.call(
            Capability::Window,
            "addEventListener",
            &JsValue::Undefined,
            &[JsValue::from("hashchange"), cb],
        )
        .unwrap();

        assert_eq!(host.navigate_fragment("#one"), 1);
        assert_eq!(host.navigate_fragment("one"), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(host.location_href(), "https://example.com/page#one");
    }

    #[test]
    fn test_form_reset_restores_defaults() {
        let (host, _) = host(
            "<form id='f'><input id='q' value='default'></form>",
            "https://example.com/",
        );
        let doc = host.document();
        let (form, input) = {
            let mut doc = lock(&doc);
            let form = doc.get_element_by_id("f").unwrap();
            let input = doc.get_element_by_id("q").unwrap();
            doc.tree.set_value(input, "typed");
            (form, input)
        };

        host.call(Capability::HtmlFormElement, "reset", &JsValue::Node(form), &[])
            .unwrap();
        let doc = lock(&doc);
        let value = doc
            .tree
            .get(input)
            .and_then(|n| n.as_element())
            .and_then(|e| e.current_value());
        assert_eq!(value, Some("default"));
    }

    #[test]
    fn test_element_listener_needs_node_receiver() {
        let (host, _) = host("", "https://example.com/");
        let (cb, _) = counter();
        let err = host
            .call(
                Capability::Element,
                "addEventListener",
                &JsValue::Undefined,
                &[JsValue::from("click"), cb],
            )
            .unwrap_err();
        assert_eq!(err, JsError::TypeError("Illegal invocation".into()));
    }

    #[test]
    fn test_connections_and_requests() {
        let (host, _) = host("", "https://example.com/");
        let ws = host
            .call(
                Capability::Window,
                "WebSocket",
                &JsValue::Undefined,
                &[JsValue::from("wss://example.com/live")],
            )
            .unwrap();
        assert!(matches!(ws, JsValue::Handle(HostHandle { kind: HandleKind::WebSocket, .. })));
        host.call(Capability::Window, "fetch", &JsValue::Undefined, &[JsValue::from("/api")])
            .unwrap();
        host.call(Capability::Window, "close", &JsValue::Undefined, &[]).unwrap();

        assert_eq!(host.connections()[0].url, "wss://example.com/live");
        assert_eq!(host.requests(), vec!["/api".to_string()]);
        assert!(host.is_closed());
        assert!(host
            .call(Capability::Window, "fetch", &JsValue::Undefined, &[])
            .is_err());
    }
}
