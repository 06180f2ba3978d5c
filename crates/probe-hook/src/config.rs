//! Hub configuration

use serde::Deserialize;

/// What the hub installs and how
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Multiplier applied to setTimeout / setInterval delays
    pub speed_up_factor: f64,
    /// Characters of outerHTML kept in listener records
    pub snippet_limit: usize,
    /// Install the Element.addEventListener hook
    pub hook_listeners: bool,
    /// Install the navigation sinks
    pub hook_navigation: bool,
    /// Install the form reset, window.close and timer hooks
    pub hook_misc: bool,
    /// Leave listeners on BODY out of the log
    pub skip_body_listeners: bool,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            speed_up_factor: 0.1,
            snippet_limit: 100,
            hook_listeners: true,
            hook_navigation: true,
            hook_misc: true,
            skip_body_listeners: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: HookConfig =
            serde_json::from_str(r#"{"speed_up_factor": 0.5, "hook_misc": false}"#).unwrap();
        assert_eq!(config.speed_up_factor, 0.5);
        assert!(!config.hook_misc);
        assert_eq!(config.snippet_limit, 100);
        assert!(config.hook_listeners);
    }
}
