//! Read-only view over host tree nodes

use probe_dom::{NodeData, NodeRef};

/// DOM node type, as far as addressing cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Attribute,
    Text,
    CData,
    Comment,
    ProcessingInstruction,
    /// Doctype and anything else without an address of its own
    Other,
}

impl NodeKind {
    /// Kind used when comparing siblings: CDATA sections count as text.
    pub fn sibling_category(self) -> Self {
        match self {
            Self::CData => Self::Text,
            kind => kind,
        }
    }
}

/// A node of the host document.
///
/// Handles are cheap to clone and compare equal when they denote the same
/// node. Everything here is read-only; the addressing code never mutates
/// the tree.
pub trait TreeNode: Clone + PartialEq {
    fn kind(&self) -> NodeKind;

    /// DOM `nodeName` (uppercased tag for HTML elements)
    fn node_name(&self) -> String;

    /// DOM `localName`, defined for elements and attributes
    fn local_name(&self) -> Option<String>;

    fn attribute(&self, name: &str) -> Option<String>;

    /// All attributes in source order
    fn attributes(&self) -> Vec<(String, String)>;

    fn parent_node(&self) -> Option<Self>;

    /// Child nodes in document order (all kinds)
    fn child_nodes(&self) -> Vec<Self>;

    /// DOM `textContent`
    fn text_content(&self) -> String;

    /// DOM `outerHTML`; hosts without a serializer may leave this empty
    fn outer_html(&self) -> String {
        String::new()
    }

    /// Current value of a form control
    fn value(&self) -> Option<String> {
        self.attribute("value")
    }

    /// Non-empty `id` attribute
    fn element_id(&self) -> Option<String> {
        self.attribute("id").filter(|id| !id.is_empty())
    }

    /// `class` attribute split on whitespace
    fn class_list(&self) -> Vec<String> {
        self.attribute("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn is_element(&self) -> bool {
        self.kind() == NodeKind::Element
    }

    fn element_children(&self) -> Vec<Self> {
        self.child_nodes().into_iter().filter(|c| c.is_element()).collect()
    }

    /// Lowercased local name of an element, for tag comparisons
    fn tag(&self) -> Option<String> {
        if self.is_element() {
            self.local_name().map(|n| n.to_ascii_lowercase())
        } else {
            None
        }
    }
}

impl TreeNode for NodeRef<'_> {
    fn kind(&self) -> NodeKind {
        match self.data() {
            Some(NodeData::Document) => NodeKind::Document,
            Some(NodeData::Element(_)) => NodeKind::Element,
            Some(NodeData::Attribute { .. }) => NodeKind::Attribute,
            Some(NodeData::Text(_)) => NodeKind::Text,
            Some(NodeData::CData(_)) => NodeKind::CData,
            Some(NodeData::Comment(_)) => NodeKind::Comment,
            Some(NodeData::ProcessingInstruction { .. }) => NodeKind::ProcessingInstruction,
            Some(NodeData::Doctype { .. }) | None => NodeKind::Other,
        }
    }

    fn node_name(&self) -> String {
        match self.data() {
            Some(NodeData::Document) => "#document".into(),
            Some(NodeData::Element(e)) => e.tag_name(),
            Some(NodeData::Attribute { name, .. }) => name.clone(),
            Some(NodeData::Text(_)) => "#text".into(),
            Some(NodeData::CData(_)) => "#cdata-section".into(),
            Some(NodeData::Comment(_)) => "#comment".into(),
            Some(NodeData::ProcessingInstruction { target, .. }) => target.clone(),
            Some(NodeData::Doctype { name, .. }) => name.clone(),
            None => String::new(),
        }
    }

    fn local_name(&self) -> Option<String> {
        match self.data()? {
            NodeData::Element(e) => Some(e.local_name.clone()),
            NodeData::Attribute { name, .. } => Some(name.clone()),
            _ => None,
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.as_element()?.get_attr(name).map(str::to_string)
    }

    fn attributes(&self) -> Vec<(String, String)> {
        self.as_element()
            .map(|e| {
                e.attrs
                    .iter()
                    .map(|a| (a.name.clone(), a.value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn parent_node(&self) -> Option<Self> {
        NodeRef::parent(self)
    }

    fn child_nodes(&self) -> Vec<Self> {
        NodeRef::children(self).collect()
    }

    fn text_content(&self) -> String {
        probe_dom::text_content(self.tree(), NodeRef::id(self))
    }

    fn outer_html(&self) -> String {
        if self.as_element().is_some() {
            probe_dom::outer_html(self.tree(), NodeRef::id(self))
        } else {
            String::new()
        }
    }

    fn value(&self) -> Option<String> {
        let elem = self.as_element()?;
        if let Some(value) = elem.current_value() {
            return Some(value.to_string());
        }
        // A textarea's default value is its text
        (elem.local_name == "textarea").then(|| self.text_content())
    }

    fn element_id(&self) -> Option<String> {
        self.as_element()?.id.clone().filter(|id| !id.is_empty())
    }

    fn class_list(&self) -> Vec<String> {
        self.as_element()
            .map(|e| e.classes.iter().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
