//! Document - High-level document API

use crate::node::NodeData;
use crate::{DomTree, NodeId, NodeRef};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with an empty html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Re-resolve the cached html/head/body references after the tree
    /// was built externally.
    pub fn finalize(&mut self) {
        let root = self.tree.root();
        self.html_element = self
            .tree
            .element_children(root)
            .find(|&id| self.is_tag(id, "html"))
            .unwrap_or(NodeId::NONE);

        if self.html_element.is_valid() {
            let html = self.html_element;
            self.head_element = self
                .tree
                .element_children(html)
                .find(|&id| self.is_tag(id, "head"))
                .unwrap_or(NodeId::NONE);
            self.body_element = self
                .tree
                .element_children(html)
                .find(|&id| self.is_tag(id, "body"))
                .unwrap_or(NodeId::NONE);
        }
        tracing::debug!(
            "document finalized: html={:?} head={:?} body={:?}",
            self.html_element,
            self.head_element,
            self.body_element
        );
    }

    fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tree
            .get(id)
            .and_then(|n| n.as_element())
            .is_some_and(|e| e.local_name == tag)
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }

    /// Get document title
    pub fn title(&self) -> String {
        // Find <title> in <head>
        if !self.head_element.is_valid() {
            return String::new();
        }

        self.tree
            .element_children(self.head_element)
            .find(|&id| self.is_tag(id, "title"))
            .map(|id| crate::text_content(&self.tree, id).trim().to_string())
            .unwrap_or_default()
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// First element in document order whose id is `id`
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|(_, node)| {
                node.as_element()
                    .and_then(|e| e.id.as_deref())
                    .is_some_and(|v| v == id)
            })
            .map(|(node_id, _)| node_id)
    }

    /// All elements with the given local name, in document order
    pub fn get_elements_by_tag_name(&self, tag: &str) -> Vec<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .filter(|(_, node)| {
                node.as_element()
                    .is_some_and(|e| e.local_name.eq_ignore_ascii_case(tag))
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Is `id` connected to this document?
    pub fn contains(&self, id: NodeId) -> bool {
        if id == self.tree.root() {
            return true;
        }
        match self.tree.get(id).map(|n| &n.data) {
            None | Some(NodeData::Attribute { .. }) => false,
            Some(_) => self.tree.ancestors(id).any(|a| a == self.tree.root()),
        }
    }

    /// Borrowing handle
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        self.tree.node(id)
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
