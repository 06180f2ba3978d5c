//! Element descriptors
//!
//! A plain-data snapshot of an element, detached from the tree so later DOM
//! mutation cannot change it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::node_view::TreeNode;
use crate::{css_path, xpath};

/// Snapshot of an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    pub tag_name: String,
    pub id: String,
    /// Space-joined class list
    pub classes: String,
    pub attributes: BTreeMap<String, String>,
    pub hidden: bool,
    #[serde(rename = "outerHTML")]
    pub outer_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub value: String,
    pub text_content: String,
    pub xpath: String,
    pub css_selector: String,
}

/// Describe `node`; `None` for non-elements.
///
/// `snippet_limit` truncates `outerHTML` to that many characters.
pub fn element_data<N: TreeNode>(
    node: &N,
    snippet_limit: Option<usize>,
) -> Option<ElementDescriptor> {
    if !node.is_element() {
        return None;
    }

    let outer_html = node.outer_html();
    let outer_html = match snippet_limit {
        Some(limit) => outer_html.chars().take(limit).collect(),
        None => outer_html,
    };

    Some(ElementDescriptor {
        tag_name: node.node_name(),
        id: node.attribute("id").unwrap_or_default(),
        classes: node.class_list().join(" "),
        attributes: node.attributes().into_iter().collect(),
        hidden: node.attribute("hidden").is_some(),
        outer_html,
        name: node.attribute("name"),
        kind: control_type(node),
        value: node.value().unwrap_or_default(),
        text_content: node.text_content().trim().to_string(),
        xpath: xpath(node, false),
        css_selector: css_path(node, false),
    })
}

/// The `type` property of a form control
fn control_type<N: TreeNode>(node: &N) -> Option<String> {
    let declared = node.attribute("type").map(|t| t.to_ascii_lowercase());
    match node.tag()?.as_str() {
        "input" => Some(declared.filter(|t| !t.is_empty()).unwrap_or_else(|| "text".into())),
        "button" => Some(match declared.as_deref() {
            Some("reset") | Some("button") => declared.unwrap_or_default(),
            _ => "submit".into(),
        }),
        "select" => Some(if node.attribute("multiple").is_some() {
            "select-multiple".into()
        } else {
            "select-one".into()
        }),
        "textarea" => Some("textarea".into()),
        "fieldset" => Some("fieldset".into()),
        "output" => Some("output".into()),
        _ => declared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_dom::DomTree;

    #[test]
    fn test_element_data() {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        tree.append_child(tree.root(), html);
        tree.append_child(html, body);
        let button = tree.create_element("button");
        tree.set_attribute(button, "class", "btn primary");
        tree.set_attribute(button, "name", "go");
        let label = tree.create_text("  Send  ");
        tree.append_child(body, button);
        tree.append_child(button, label);

        let data = element_data(&tree.node(button), None).unwrap();
        assert_eq!(data.tag_name, "BUTTON");
        assert_eq!(data.id, "");
        assert_eq!(data.classes, "btn primary");
        assert_eq!(data.name.as_deref(), Some("go"));
        assert_eq!(data.kind.as_deref(), Some("submit"));
        assert_eq!(data.text_content, "Send");
        assert_eq!(data.xpath, "/html/body/button");
        assert_eq!(data.css_selector, "HTML > BODY > BUTTON");
        assert!(data.outer_html.starts_with("<button"));

        let short = element_data(&tree.node(button), Some(7)).unwrap();
        assert_eq!(short.outer_html, "<button");
        assert!(element_data(&tree.node(label), None).is_none());
    }

    #[test]
    fn test_control_types() {
        let mut tree = DomTree::new();
        let input = tree.create_element("input");
        let select = tree.create_element("select");
        tree.set_attribute(select, "multiple", "");
        let div = tree.create_element("div");

        assert_eq!(control_type(&tree.node(input)).as_deref(), Some("text"));
        assert_eq!(control_type(&tree.node(select)).as_deref(), Some("select-multiple"));
        assert_eq!(control_type(&tree.node(div)), None);

        tree.set_attribute(input, "type", "Password");
        assert_eq!(control_type(&tree.node(input)).as_deref(), Some("password"));
    }

    #[test]
    fn test_serialized_field_names() {
        let mut tree = DomTree::new();
        let a = tree.create_element("a");
        tree.set_attribute(a, "href", "/x");
        tree.append_child(tree.root(), a);

        let json = serde_json::to_value(element_data(&tree.node(a), None).unwrap()).unwrap();
        assert_eq!(json["tagName"], "A");
        assert_eq!(json["outerHTML"], "<a href=\"/x\"></a>");
        assert_eq!(json["cssSelector"], "A");
        assert_eq!(json["attributes"]["href"], "/x");
        assert!(json.get("type").is_none());
    }
}
