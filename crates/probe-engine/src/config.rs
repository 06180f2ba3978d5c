//! Engine Configuration

use probe_hook::HookConfig;
use serde::Deserialize;

use crate::EngineError;

/// Engine configuration options
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL the page is loaded at
    pub url: String,

    /// Instrumentation settings
    pub hook: HookConfig,

    /// Keep whitespace-only text nodes from the source
    pub keep_whitespace: bool,
}

impl Config {
    /// Load a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            hook: HookConfig::default(),
            keep_whitespace: false,
        }
    }
}
