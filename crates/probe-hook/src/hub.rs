//! Instrumentation hub
//!
//! Replaces navigation sinks, listener registration and a handful of
//! page-disruptive APIs on an [`ExecutionEnvironment`], recording what the
//! page does into two append-only logs. Every replaced member is locked
//! (non-writable, non-configurable) right after it is defined so page
//! script cannot undo the hook.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use probe_dom::Document;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::HookConfig;
use crate::host::{lock, ExecutionEnvironment};
use crate::records::{EventListenerRecord, Log, NavigationEvent, NavigationSource};
use crate::surface::{Capability, Surface};
use crate::value::{JsFunction, JsValue};

/// Surface marker set by the first hub that installs
const INSTALLED_MARKER: &str = "__pageprobe_instrumented";

/// Result of [`InstrumentationHub::install`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    /// This hub, or another one, already instrumented the surface
    AlreadyInstalled,
}

/// Installs the hooks and owns the logs they write to
pub struct InstrumentationHub {
    config: HookConfig,
    installed: AtomicBool,
    navigated_links: Log<NavigationEvent>,
    event_listeners: Log<EventListenerRecord>,
}

impl InstrumentationHub {
    pub fn new(config: HookConfig) -> Self {
        Self {
            config,
            installed: AtomicBool::new(false),
            navigated_links: Log::new(),
            event_listeners: Log::new(),
        }
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Instrument `env`. Only the first installation against a surface
    /// does anything.
    pub fn install<E: ExecutionEnvironment + ?Sized>(&self, env: &E) -> InstallOutcome {
        if self.installed.load(Ordering::SeqCst) {
            debug!("hub already installed");
            return InstallOutcome::AlreadyInstalled;
        }
        let surface = env.surface();
        if !surface.mark(INSTALLED_MARKER) {
            debug!("surface already instrumented by another hub");
            return InstallOutcome::AlreadyInstalled;
        }
        self.installed.store(true, Ordering::SeqCst);

        self.navigated_links.clear();
        self.event_listeners.clear();

        if self.config.hook_listeners {
            self.hook_add_event_listener(env);
        }
        if self.config.hook_navigation {
            self.hook_navigated_link_sinks(env);
        }
        if self.config.hook_misc {
            self.hook_miscellaneous_utilities(env);
        }

        info!("instrumentation installed");
        InstallOutcome::Installed
    }

    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    /// Navigation log, in call order
    pub fn navigated_links(&self) -> Vec<NavigationEvent> {
        self.navigated_links.snapshot()
    }

    /// Listener log, in call order
    pub fn event_listeners(&self) -> Vec<EventListenerRecord> {
        self.event_listeners.snapshot()
    }

    /// Capture element listener registrations
    fn hook_add_event_listener<E: ExecutionEnvironment + ?Sized>(&self, env: &E) {
        let surface = env.surface();
        let Some(original) = original(surface, Capability::Element, "addEventListener") else {
            return;
        };

        let document = env.document();
        let log = self.event_listeners.clone();
        let snippet_limit = self.config.snippet_limit;
        let skip_body = self.config.skip_body_listeners;

        let source = original.source().to_string();
        let hook = JsFunction::new(source, move |this, args| {
            let record = listener_record(&document, this, args, snippet_limit, skip_body);
            if let Some(record) = record {
                info!(
                    element = %record.element.css_selector,
                    event = %record.event_type,
                    "[hook] got event listener"
                );
                log.push(record);
            }
            original.call(this, args)
        });
        install_member(surface, Capability::Element, "addEventListener", hook);
    }

    /// Capture every URL the page tries to reach
    fn hook_navigated_link_sinks<E: ExecutionEnvironment + ?Sized>(&self, env: &E) {
        let surface = env.surface();

        for (member, source) in [
            ("pushState", NavigationSource::PushState),
            ("replaceState", NavigationSource::ReplaceState),
        ] {
            let log = self.navigated_links.clone();
            let hook = JsFunction::new(format!("function {member}(a, b, c) {{}}"), move |_, args| {
                let url = args.get(2).and_then(JsValue::to_url_arg);
                log.push(NavigationEvent::new(url, source));
                Ok(JsValue::Undefined)
            });
            install_member(surface, Capability::History, member, hook);
        }

        let log = self.navigated_links.clone();
        let hook = JsFunction::new("function open(url) {}", move |_, args| {
            let url = args.first().and_then(JsValue::to_url_arg);
            info!("[hook] open url request {}", url.as_deref().unwrap_or("undefined"));
            log.push(NavigationEvent::new(url, NavigationSource::WindowOpen));
            Ok(JsValue::Undefined)
        });
        install_member(surface, Capability::Window, "open", hook);

        self.watch_hash_changes(env);

        for (member, source) in [
            ("WebSocket", NavigationSource::WebSocket),
            ("EventSource", NavigationSource::EventSource),
            ("fetch", NavigationSource::Fetch),
        ] {
            let Some(original) = original(surface, Capability::Window, member) else {
                continue;
            };
            let log = self.navigated_links.clone();
            let source_text = original.source().to_string();
            let hook = JsFunction::new(source_text, move |this, args| {
                let url = args.first().and_then(JsValue::to_url_arg);
                log.push(NavigationEvent::new(url, source));
                original.call(this, args)
            });
            install_member(surface, Capability::Window, member, hook);
        }
    }

    /// Record the location on every `hashchange`
    fn watch_hash_changes<E: ExecutionEnvironment + ?Sized>(&self, env: &E) {
        let location = env.location();
        let log = self.navigated_links.clone();
        let listener = JsFunction::new("function () {}", move |_, _| {
            let href = lock(&location).href();
            log.push(NavigationEvent::new(Some(href), NavigationSource::HashChange));
            Ok(JsValue::Undefined)
        });

        let args = [JsValue::from("hashchange"), JsValue::Function(listener)];
        if let Err(e) = env
            .surface()
            .call(Capability::Window, "addEventListener", &JsValue::Undefined, &args)
        {
            warn!("[hook] could not watch hashchange: {}", e);
        }
    }

    /// Neutralize form reset and window.close, and speed up timers
    fn hook_miscellaneous_utilities<E: ExecutionEnvironment + ?Sized>(&self, env: &E) {
        let surface = env.surface();

        let hook = JsFunction::new("function reset() {}", |_, _| {
            info!("[hook] cancel reset form");
            Ok(JsValue::Undefined)
        });
        install_member(surface, Capability::HtmlFormElement, "reset", hook);

        let hook = JsFunction::new("function close() {}", |_, _| {
            info!("[hook] trying to close page.");
            Ok(JsValue::Undefined)
        });
        install_member(surface, Capability::Window, "close", hook);

        let factor = self.config.speed_up_factor;
        for member in ["setTimeout", "setInterval"] {
            let Some(original) = original(surface, Capability::Window, member) else {
                continue;
            };
            let hook = JsFunction::new(
                format!("function {member}(callback, delay, ...args) {{}}"),
                move |this, args| original.call(this, &scale_delay(args, factor)),
            );
            install_member(surface, Capability::Window, member, hook);
        }
    }
}

impl Default for InstrumentationHub {
    fn default() -> Self {
        Self::new(HookConfig::default())
    }
}

/// Current binding of `owner.member`, if it is a function
fn original(surface: &Surface, owner: Capability, member: &str) -> Option<JsFunction> {
    match surface.function(owner, member) {
        Ok(func) => Some(func),
        Err(e) => {
            warn!("[hook] skipping {}.{}: {}", owner, member, e);
            None
        }
    }
}

/// Define `owner.member` as `hook` and lock it
fn install_member(surface: &Surface, owner: Capability, member: &str, hook: JsFunction) {
    let result = surface
        .define(owner, member, JsValue::Function(hook))
        .and_then(|()| surface.lock(owner, member));
    match result {
        Ok(()) => debug!("hooked {}.{}", owner, member),
        Err(e) => warn!("[hook] could not hook {}.{}: {}", owner, member, e),
    }
}

/// Arguments with the delay (second argument) multiplied by `factor`
fn scale_delay(args: &[JsValue], factor: f64) -> Vec<JsValue> {
    let delay = args.get(1).map(JsValue::to_number).unwrap_or(f64::NAN) * factor;
    let mut scaled = args.to_vec();
    if scaled.len() < 2 {
        scaled.resize(2, JsValue::Undefined);
    }
    scaled[1] = JsValue::Number(delay);
    scaled
}

/// Build the record for `this.addEventListener(type, listener, options)`.
///
/// `None` when the receiver is not an element, or is BODY and BODY is
/// exempt.
fn listener_record(
    document: &Arc<Mutex<Document>>,
    this: &JsValue,
    args: &[JsValue],
    snippet_limit: usize,
    skip_body: bool,
) -> Option<EventListenerRecord> {
    let node = this.as_node()?;
    let element = {
        let document = lock(document);
        let node = document.node(node);
        if skip_body && node.as_element().is_some_and(|e| e.tag_name() == "BODY") {
            return None;
        }
        probe_path::element_data(&node, Some(snippet_limit))?
    };

    let event_type = args
        .first()
        .map(JsValue::to_display_string)
        .unwrap_or_else(|| "undefined".into());
    let listener = match args.get(1) {
        Some(JsValue::Function(f)) => f.source().to_string(),
        Some(other) => other.to_display_string(),
        None => "undefined".into(),
    };
    let options = match args.get(2) {
        Some(options) if options.is_truthy() => options.to_json(),
        _ => Value::Object(Map::new()),
    };

    Some(EventListenerRecord {
        element,
        event_type,
        listener,
        options,
    })
}
