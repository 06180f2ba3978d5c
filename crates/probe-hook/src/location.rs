//! Location API
//!
//! Implements window.location on top of the `url` crate.

use url::{ParseError, Url};

/// Location state
#[derive(Debug, Clone)]
pub struct LocationManager {
    url: Url,
}

impl LocationManager {
    pub fn new(url_str: &str) -> Result<Self, ParseError> {
        let url = Url::parse(url_str)?;
        Ok(Self { url })
    }

    /// Full URL
    pub fn href(&self) -> String {
        self.url.to_string()
    }

    /// Resolve `url` against the current location
    pub fn resolve(&self, url: &str) -> Result<Url, ParseError> {
        self.url.join(url)
    }

    /// Set href (navigate); relative URLs resolve against the current one
    pub fn set_href(&mut self, url: &str) -> Result<(), ParseError> {
        self.url = self.resolve(url)?;
        Ok(())
    }

    /// Set the fragment; a leading `#` is optional
    pub fn set_hash(&mut self, hash: &str) {
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        self.url.set_fragment(Some(hash));
    }
}
