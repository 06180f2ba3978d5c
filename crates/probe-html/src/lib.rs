//! pageprobe HTML Parser
//!
//! HTML5 parsing built on html5ever, producing a [`probe_dom::Document`].

mod parser;

pub use parser::HtmlParser;

use probe_dom::Document;

/// Parse an HTML string into a document at `about:blank`
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),
}
