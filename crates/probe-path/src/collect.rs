//! Page-wide element collection
//!
//! Query helpers a crawler runs over a loaded page: elements by selector or
//! XPath, forms with their controls, and elements carrying inline event
//! handlers. Everything returned is a detached [`ElementDescriptor`]-style
//! snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::descriptor::{ElementDescriptor, element_data};
use crate::node_view::TreeNode;
use crate::resolve::find_by_xpath;
use crate::selectors::{matches_selector, query_selector_all};
use crate::{css_path, xpath};

/// Controls listed by a `<form>` element (its `elements` collection)
const FORM_LISTED: &str = "button, fieldset, input, object, output, select, textarea";
/// Controls gathered from a `div.form` pseudo-form
const PSEUDO_FORM_CONTROLS: &str = "input, select, textarea, button";

/// A form or pseudo-form with its controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDescriptor {
    pub tag_name: String,
    pub id: String,
    pub classes: String,
    pub attributes: BTreeMap<String, String>,
    #[serde(rename = "outerHTML")]
    pub outer_html: String,
    /// Raw `action` attribute, empty when absent
    pub action: String,
    /// Normalized submission method; only real forms have one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub xpath: String,
    pub css_selector: String,
    pub elements: Vec<ElementDescriptor>,
}

/// An inline `on*` handler attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineListener {
    /// Handler property, e.g. `onclick`
    #[serde(rename = "type")]
    pub kind: String,
    /// Handler source as the page would stringify it
    pub listener: String,
}

/// An element together with its inline handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementListeners {
    pub element: ElementDescriptor,
    pub listeners: Vec<InlineListener>,
}

/// Describe every element below `root` matching `selector`.
pub fn get_all_elements<N: TreeNode>(root: &N, selector: &str) -> Vec<ElementDescriptor> {
    query_selector_all(root, selector)
        .iter()
        .filter_map(|node| element_data(node, None))
        .collect()
}

/// Describe the element an XPath resolves to.
pub fn get_element_from_xpath<N: TreeNode>(root: &N, path: &str) -> Option<ElementDescriptor> {
    let node = find_by_xpath(root, path)?;
    element_data(&node, None)
}

/// All `form` elements followed by all `div.form` pseudo-forms.
pub fn get_all_forms<N: TreeNode>(root: &N) -> Vec<FormDescriptor> {
    let forms = query_selector_all(root, "form");
    let pseudo_forms = query_selector_all(root, "div.form");
    tracing::debug!(
        "collecting {} forms and {} pseudo-forms",
        forms.len(),
        pseudo_forms.len()
    );

    forms
        .iter()
        .map(|form| form_data(form, true))
        .chain(pseudo_forms.iter().map(|div| form_data(div, false)))
        .collect()
}

fn form_data<N: TreeNode>(form: &N, is_form: bool) -> FormDescriptor {
    let controls: Vec<N> = if is_form {
        query_selector_all(form, FORM_LISTED)
            .into_iter()
            .filter(|c| !matches_selector(c, "input[type=image i]"))
            .collect()
    } else {
        query_selector_all(form, PSEUDO_FORM_CONTROLS)
    };

    FormDescriptor {
        tag_name: form.node_name(),
        id: form.attribute("id").unwrap_or_default(),
        classes: form.class_list().join(" "),
        attributes: form.attributes().into_iter().collect(),
        outer_html: form.outer_html(),
        action: form.attribute("action").unwrap_or_default(),
        method: is_form.then(|| form_method(form.attribute("method").as_deref())),
        xpath: xpath(form, false),
        css_selector: css_path(form, false),
        elements: controls
            .iter()
            .filter_map(|c| element_data(c, None))
            .collect(),
    }
}

/// `get`, `post` or `dialog`; anything else falls back to `get`.
fn form_method(raw: Option<&str>) -> String {
    match raw.map(|m| m.trim().to_ascii_lowercase()).as_deref() {
        Some(m @ ("post" | "dialog")) => m.to_string(),
        _ => "get".to_string(),
    }
}

/// Elements below `root` with at least one inline `on*` handler.
pub fn get_all_elements_with_event_listeners<N: TreeNode>(root: &N) -> Vec<ElementListeners> {
    query_selector_all(root, "*")
        .iter()
        .filter_map(|node| {
            let listeners: Vec<InlineListener> = node
                .attributes()
                .into_iter()
                .filter(|(name, _)| is_handler_attribute(name))
                .map(|(name, body)| InlineListener {
                    listener: format!("function {name}(event) {{\n{body}\n}}"),
                    kind: name,
                })
                .collect();
            if listeners.is_empty() {
                return None;
            }
            Some(ElementListeners {
                element: element_data(node, None)?,
                listeners,
            })
        })
        .collect()
}

fn is_handler_attribute(name: &str) -> bool {
    name.len() > 2
        && name
            .get(..2)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_method() {
        assert_eq!(form_method(None), "get");
        assert_eq!(form_method(Some("POST")), "post");
        assert_eq!(form_method(Some(" dialog ")), "dialog");
        assert_eq!(form_method(Some("put")), "get");
    }

    #[test]
    fn test_is_handler_attribute() {
        assert!(is_handler_attribute("onclick"));
        assert!(is_handler_attribute("onMouseOver"));
        assert!(!is_handler_attribute("on"));
        assert!(!is_handler_attribute("href"));
    }
}
