//! DOM Tree (arena-based allocation)

use crate::node::{ElementData, Namespace, Node, NodeData};
use crate::NodeId;

/// Arena-based DOM tree. Slot 0 is always the document node.
#[derive(Debug, Clone)]
pub struct DomTree {
    pub(crate) nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
        }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Borrowing handle for `id`
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// Number of nodes in the tree (detached ones included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Only the document node exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    /// Create a detached HTML element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(name)))
    }

    pub fn create_element_ns(&mut self, name: &str, namespace: Namespace) -> NodeId {
        self.push(NodeData::Element(ElementData::with_namespace(name, namespace)))
    }

    /// Insert a fully built element (used by the HTML front end)
    pub fn create_element_from(&mut self, data: ElementData) -> NodeId {
        self.push(NodeData::Element(data))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    pub fn create_cdata(&mut self, text: &str) -> NodeId {
        self.push(NodeData::CData(text.to_string()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Comment(text.to_string()))
    }

    pub fn create_processing_instruction(&mut self, target: &str, data: &str) -> NodeId {
        self.push(NodeData::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        })
    }

    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        })
    }

    /// Snapshot attribute `name` of `owner` as an attribute node.
    ///
    /// The node's parent is the owner element; it is not one of its children.
    pub fn create_attribute_node(&mut self, owner: NodeId, name: &str) -> Option<NodeId> {
        let value = self.get(owner)?.as_element()?.get_attr(name)?.to_string();
        let id = self.push(NodeData::Attribute {
            name: name.to_string(),
            value,
        });
        self.nodes[id.index()].parent = owner;
        Some(id)
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    ///
    /// Returns false (and leaves the tree untouched) when either id is out
    /// of range, when `child` is the document, or when the append would
    /// create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.get(parent).is_none() || self.get(child).is_none() || child == NodeId::ROOT {
            return false;
        }
        if matches!(self.nodes[child.index()].data, NodeData::Attribute { .. }) {
            return false;
        }
        if self.ancestors(parent).any(|a| a == child) || parent == child {
            return false;
        }

        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        true
    }

    /// Unlink `id` from its parent and siblings. The node stays in the arena.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() || matches!(node.data, NodeData::Attribute { .. }) {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Parent of `id`, if any
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Iterate over the child nodes of `id`
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let next = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Children { tree: self, next }
    }

    /// Element children of `id`
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(|(_, node)| node.is_element())
            .map(|(child, _)| child)
    }

    /// Pre-order walk of everything below `id` (exclusive)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let next = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Descendants {
            tree: self,
            root: id,
            next,
        }
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.get_attr(name)
    }

    /// Set an attribute on an element. Returns false for non-elements.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        match self.get_mut(id).and_then(|n| n.as_element_mut()) {
            Some(elem) => {
                elem.set_attr(name, value);
                true
            }
            None => false,
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.get_mut(id)?.as_element_mut()?.remove_attr(name)
    }

    /// Set the live value of a form control (what a user or crawler typed)
    pub fn set_value(&mut self, id: NodeId, value: &str) -> bool {
        match self.get_mut(id).and_then(|n| n.as_element_mut()) {
            Some(elem) => {
                elem.value = Some(value.to_string());
                true
            }
            None => false,
        }
    }

    /// Drop the live value so the control shows its default again
    pub fn reset_value(&mut self, id: NodeId) {
        if let Some(elem) = self.get_mut(id).and_then(|n| n.as_element_mut()) {
            elem.value = None;
        }
    }

    /// Replace the character data of a text-like node
    pub fn set_text(&mut self, id: NodeId, text: &str) -> bool {
        match self.get_mut(id).map(|n| &mut n.data) {
            Some(NodeData::Text(t) | NodeData::CData(t) | NodeData::Comment(t)) => {
                *t = text.to_string();
                true
            }
            _ => false,
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Child iterator
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Pre-order descendant iterator
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut cursor = id;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let Some(current) = self.tree.get(cursor) else {
                    break NodeId::NONE;
                };
                if current.next_sibling.is_valid() {
                    break current.next_sibling;
                }
                cursor = current.parent;
                if !cursor.is_valid() {
                    break NodeId::NONE;
                }
            }
        };
        Some((id, node))
    }
}

/// Borrowed handle to one node of a [`DomTree`].
///
/// Two handles are equal when they point at the same slot of the same tree.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a DomTree {
        self.tree
    }

    pub fn get(&self) -> Option<&'a Node> {
        self.tree.get(self.id)
    }

    pub fn data(&self) -> Option<&'a NodeData> {
        self.get().map(|n| &n.data)
    }

    pub fn as_element(&self) -> Option<&'a ElementData> {
        self.get()?.as_element()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.tree.parent(self.id).map(|id| self.tree.node(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        tree.children(self.id).map(move |(id, _)| tree.node(id))
    }

    pub fn descendants(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        tree.descendants(self.id).map(move |(id, _)| tree.node(id))
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_siblings() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("p");
        let b = tree.create_text("hi");
        let c = tree.create_element("p");

        assert!(tree.append_child(tree.root(), div));
        for child in [a, b, c] {
            assert!(tree.append_child(div, child));
        }

        let kids: Vec<_> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(kids, vec![a, b, c]);
        let elems: Vec<_> = tree.element_children(div).collect();
        assert_eq!(elems, vec![a, c]);
        assert_eq!(tree.parent(b), Some(div));
    }

    #[test]
    fn test_detach_middle_child() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        let c = tree.create_element("i");
        tree.append_child(tree.root(), div);
        tree.append_child(div, a);
        tree.append_child(div, b);
        tree.append_child(div, c);

        tree.detach(b);
        let kids: Vec<_> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(kids, vec![a, c]);
        assert_eq!(tree.parent(b), None);

        // Re-append moves it to the end
        tree.append_child(div, b);
        let kids: Vec<_> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(kids, vec![a, c, b]);
    }

    #[test]
    fn test_append_rejects_cycles() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(tree.root(), outer);
        tree.append_child(outer, inner);

        assert!(!tree.append_child(inner, outer));
        assert!(!tree.append_child(inner, inner));
        assert!(!tree.append_child(inner, NodeId::ROOT));
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        let p = tree.create_element("p");
        let t = tree.create_text("x");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), html);
        tree.append_child(html, body);
        tree.append_child(body, p);
        tree.append_child(p, t);
        tree.append_child(body, span);

        let order: Vec<_> = tree.descendants(tree.root()).map(|(id, _)| id).collect();
        assert_eq!(order, vec![html, body, p, t, span]);

        let under_p: Vec<_> = tree.descendants(p).map(|(id, _)| id).collect();
        assert_eq!(under_p, vec![t]);
    }

    #[test]
    fn test_attribute_node_parent() {
        let mut tree = DomTree::new();
        let a = tree.create_element("a");
        tree.append_child(tree.root(), a);
        tree.set_attribute(a, "href", "/next");

        let attr = tree.create_attribute_node(a, "href").unwrap();
        assert_eq!(tree.parent(attr), Some(a));
        assert_eq!(tree.children(a).count(), 0);
        assert!(tree.create_attribute_node(a, "missing").is_none());
    }

    #[test]
    fn test_node_ref_equality() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.append_child(tree.root(), div);

        let other = tree.clone();
        assert_eq!(tree.node(div), tree.node(div));
        assert_ne!(tree.node(div), other.node(div));
        assert_eq!(tree.node(div).parent(), Some(tree.node(NodeId::ROOT)));
    }
}
