//! pageprobe instrumentation
//!
//! In-page hooks for a crawler: navigation sinks (history, window.open,
//! hashchange, WebSocket, EventSource, fetch), element listener capture,
//! timer acceleration and the neutralization of form reset and
//! window.close.
//!
//! The page's global object is modelled by a [`Surface`] of native
//! functions; [`PageHost`] is a complete environment with ordinary browser
//! behaviour behind those functions, and [`InstrumentationHub`] swaps in
//! the hooks and collects what they see.

mod config;
mod error;
mod events;
mod history;
mod host;
mod hub;
mod location;
mod records;
mod surface;
mod timers;
mod value;

pub use config::HookConfig;
pub use error::JsError;
pub use events::{EventListenerRegistry, EventTarget};
pub use history::{HistoryEntry, HistoryManager};
pub use host::{Connection, ExecutionEnvironment, PageHost};
pub use hub::{InstallOutcome, InstrumentationHub};
pub use location::LocationManager;
pub use records::{EventListenerRecord, Log, NavigationEvent, NavigationSource};
pub use surface::{Capability, PropertyDescriptor, Surface};
pub use timers::{Clock, ManualClock, SystemClock, Timer, TimerManager};
pub use value::{HandleKind, HostHandle, JsFunction, JsValue, NativeFunction};
