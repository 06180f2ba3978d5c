//! pageprobe
//!
//! Loads an HTML page into an instrumented environment and reports what the
//! page does: URLs it tries to reach, listeners it registers, forms and
//! inline handlers it carries.
//!
//! # Example
//! ```rust,ignore
//! use probe_engine::{Config, Engine};
//!
//! let engine = Engine::new(Config { url: "https://example.com/".into(), ..Config::default() });
//! let page = engine.load_html("<form action='/login'><input name='user'></form>")?;
//! println!("{}", serde_json::to_string_pretty(&page.report())?);
//! ```

mod config;
mod engine;
mod page;

pub use config::Config;
pub use engine::{Engine, EngineError};
pub use page::{Page, PageReport};

pub use probe_dom as dom;
pub use probe_hook as hook;
pub use probe_path as path;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
