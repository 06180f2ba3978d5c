//! Engine - Main entry point

use std::sync::Arc;

use probe_hook::{Clock, InstallOutcome, InstrumentationHub, PageHost, SystemClock};
use probe_html::HtmlParser;

use crate::{Config, Page};

/// Loads pages and instruments them
pub struct Engine {
    config: Config,
}

impl Engine {
    /// Create a new engine with the given configuration
    pub fn new(config: Config) -> Self {
        tracing::info!("pageprobe {} initialized", crate::VERSION);
        Self { config }
    }

    /// Parse `html` at the configured URL and install the hooks
    pub fn load_html(&self, html: &str) -> Result<Page, EngineError> {
        self.load_html_with_clock(html, Arc::new(SystemClock::new()))
    }

    /// Like [`Engine::load_html`], with page timers driven by `clock`
    pub fn load_html_with_clock(
        &self,
        html: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Page, EngineError> {
        tracing::info!("Loading: {}", self.config.url);

        let document = HtmlParser::new()
            .keep_whitespace(self.config.keep_whitespace)
            .parse_with_url(html, &self.config.url)?;
        let host = PageHost::new(document, clock)?;

        let hub = InstrumentationHub::new(self.config.hook.clone());
        if hub.install(&host) == InstallOutcome::AlreadyInstalled {
            tracing::warn!("page was already instrumented");
        }

        Ok(Page::new(host, hub))
    }

    /// Get engine configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Parse error: {0}")]
    Parse(#[from] probe_html::ParseError),

    #[error("JavaScript error: {0}")]
    JavaScript(#[from] probe_hook::JsError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
