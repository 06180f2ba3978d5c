//! DOMTokenList (classList)
//!
//! Ordered, whitespace-separated token list backing `class`.

/// DOMTokenList for managing space-separated tokens (e.g., classList)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    /// Create empty token list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from space-separated string.
    ///
    /// Duplicates are kept in source order, the way `class="a a"` reads
    /// back through `getAttribute`.
    pub fn from_string(s: &str) -> Self {
        let tokens = s.split_whitespace().map(|s| s.to_string()).collect();
        Self { tokens }
    }

    /// Get number of tokens
    pub fn length(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Check if token exists
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Set from string
    pub fn set_value(&mut self, value: &str) {
        *self = Self::from_string(value);
    }

    /// Iterate over tokens
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string() {
        let list = DOMTokenList::from_string("btn btn-primary\tactive\n");
        assert_eq!(list.length(), 3);
        assert!(list.contains("btn"));
        assert!(list.contains("btn-primary"));
        assert_eq!(list.iter().last(), Some("active"));
    }

    #[test]
    fn test_duplicates_kept_in_order() {
        let mut list = DOMTokenList::new();
        assert!(list.is_empty());

        list.set_value("b a b");
        let tokens: Vec<&str> = list.iter().collect();
        assert_eq!(tokens, vec!["b", "a", "b"]);

        list.set_value("   ");
        assert!(list.is_empty());
    }
}
