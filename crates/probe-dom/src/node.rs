//! DOM Node
//!
//! Linked arena node: parent / first / last / prev / next are [`NodeId`]s
//! into the owning [`DomTree`](crate::DomTree).

use crate::{DOMTokenList, NodeId};

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if root or detached).
    ///
    /// Attribute nodes point at their owner element here but are never
    /// linked into the owner's child list.
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text (CDATA counts as text)
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_) | NodeData::CData(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get character data if this is a text or CDATA node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) | NodeData::CData(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// CDATA section
    CData(String),
    /// Comment
    Comment(String),
    /// Processing instruction
    ProcessingInstruction { target: String, data: String },
    /// Attribute node, detached snapshot of one attribute of its owner
    Attribute { name: String, value: String },
}

/// Element namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Namespace {
    #[default]
    Html,
    Svg,
    MathMl,
    Other,
}

impl Namespace {
    pub fn from_uri(uri: &str) -> Self {
        match uri {
            "" | "http://www.w3.org/1999/xhtml" => Self::Html,
            "http://www.w3.org/2000/svg" => Self::Svg,
            "http://www.w3.org/1998/Math/MathML" => Self::MathMl,
            _ => Self::Other,
        }
    }
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Local name, as written by the parser (lowercase for HTML)
    pub local_name: String,
    pub namespace: Namespace,
    /// Attributes in source order
    pub attrs: Vec<Attribute>,
    /// Cached id attribute (very common lookup)
    pub id: Option<String>,
    /// Cached class list
    pub classes: DOMTokenList,
    /// Live ("dirty") value of a form control. `None` means the control
    /// still shows its default value.
    pub value: Option<String>,
}

impl ElementData {
    pub fn new(local_name: &str) -> Self {
        Self::with_namespace(local_name, Namespace::Html)
    }

    pub fn with_namespace(local_name: &str, namespace: Namespace) -> Self {
        let local_name = match namespace {
            Namespace::Html => local_name.to_ascii_lowercase(),
            _ => local_name.to_string(),
        };
        Self {
            local_name,
            namespace,
            attrs: Vec::new(),
            id: None,
            classes: DOMTokenList::new(),
            value: None,
        }
    }

    /// DOM `tagName`: uppercased for HTML elements, verbatim otherwise.
    pub fn tag_name(&self) -> String {
        match self.namespace {
            Namespace::Html => self.local_name.to_ascii_uppercase(),
            _ => self.local_name.clone(),
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Set an attribute, keeping the id / class caches in sync
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match name {
            "id" => self.id = Some(value.to_string()),
            "class" => self.classes.set_value(value),
            _ => {}
        }

        // Check if attribute already exists
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
            attr.value = value.to_string();
            return;
        }
        self.attrs.push(Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|a| a.name == name)?;
        match name {
            "id" => self.id = None,
            "class" => self.classes = DOMTokenList::new(),
            _ => {}
        }
        Some(self.attrs.remove(pos).value)
    }

    /// Current value of a form control: the live value if one was set,
    /// otherwise the `value` attribute.
    pub fn current_value(&self) -> Option<&str> {
        self.value.as_deref().or_else(|| self.get_attr("value"))
    }

    /// Is this one of `input`, `select`, `textarea`, `button`?
    pub fn is_form_control(&self) -> bool {
        self.namespace == Namespace::Html
            && matches!(
                self.local_name.as_str(),
                "input" | "select" | "textarea" | "button"
            )
    }
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}
