//! One segment of a CSS or XPath address

/// A single path segment produced while walking towards the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub value: String,
    /// Terminal shortcut: the walk stops after this step.
    pub optimized: bool,
}

impl PathStep {
    pub fn new(value: impl Into<String>, optimized: bool) -> Self {
        Self {
            value: value.into(),
            optimized,
        }
    }

    /// Terminal step
    pub fn terminal(value: impl Into<String>) -> Self {
        Self::new(value, true)
    }
}

impl std::fmt::Display for PathStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}
