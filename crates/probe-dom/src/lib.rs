//! pageprobe DOM
//!
//! Arena-backed document tree. This is the host-side model the addressing
//! and instrumentation crates read from; nodes are referred to by [`NodeId`].

mod classlist;
mod document;
mod node;
mod serialize;
mod tree;

pub use classlist::DOMTokenList;
pub use document::Document;
pub use node::{Attribute, ElementData, Namespace, Node, NodeData};
pub use serialize::{outer_html, text_content};
pub use tree::{Children, Descendants, DomTree, NodeRef};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this id points at a node (as opposed to [`NodeId::NONE`])
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Rebuild an id from a raw arena index.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}
