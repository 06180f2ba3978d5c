//! pageprobe node addressing
//!
//! Computes stable addresses for DOM nodes:
//! - [`css_path`]: a `" > "`-joined selector path with id / class /
//!   `:nth-child` disambiguation
//! - [`xpath`]: an absolute XPath with positional predicates
//! - [`escape_identifier`]: CSS identifier escaping used by both
//!
//! The builders only see the host tree through [`TreeNode`], which is
//! implemented here for [`probe_dom::NodeRef`].
//!
//! # Example
//! ```rust,ignore
//! let doc = probe_html::parse("<div id='main'><p>a</p><p>b</p></div>")?;
//! let second = doc.get_elements_by_tag_name("p")[1];
//! assert_eq!(probe_path::css_path(&doc.node(second), false), "DIV#main > P:nth-child(2)");
//! assert_eq!(probe_path::xpath(&doc.node(second), false), "/html/body/div/p[2]");
//! ```

mod css_path;
mod escape;
mod node_view;
mod step;
mod xpath;

pub mod collect;
pub mod descriptor;
pub mod resolve;
pub mod selectors;

pub use css_path::css_path;
pub use descriptor::{ElementDescriptor, element_data};
pub use escape::{escape_identifier, is_css_ident_char, is_css_identifier};
pub use node_view::{NodeKind, TreeNode};
pub use resolve::find_by_xpath;
pub use selectors::query_selector_all;
pub use step::PathStep;
pub use xpath::xpath;
