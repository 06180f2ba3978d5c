//! CSS selector path builder

use crate::escape::escape_identifier;
use crate::node_view::{NodeKind, TreeNode};
use crate::step::PathStep;

/// Build a `" > "`-joined CSS selector path from the root down to `node`.
///
/// Returns an empty string for non-element input. Each step prefers an id
/// (which ends the walk), then own classes when they tell the node apart
/// from same-named siblings, then `:nth-child(k)`. With `optimized` set the
/// walk stops at the first id or at `html`/`head`/`body`.
pub fn css_path<N: TreeNode>(node: &N, optimized: bool) -> String {
    if !node.is_element() {
        return String::new();
    }

    let mut steps = Vec::new();
    let mut current = Some(node.clone());
    while let Some(context) = current {
        let Some(step) = css_step(&context, optimized, context == *node) else {
            break;
        };
        let stop = step.optimized;
        steps.push(step.value);
        if stop {
            break;
        }
        current = context.parent_node();
    }

    steps.reverse();
    steps.join(" > ")
}

fn css_step<N: TreeNode>(node: &N, optimized: bool, is_target: bool) -> Option<PathStep> {
    if !node.is_element() {
        return None;
    }

    let node_name = node.node_name();
    let id = node.element_id();

    if optimized {
        if let Some(id) = &id {
            return Some(PathStep::terminal(format!("#{}", escape_identifier(id))));
        }
        let lower = node_name.to_ascii_lowercase();
        if matches!(lower.as_str(), "body" | "head" | "html") {
            return Some(PathStep::terminal(node_name));
        }
    }

    if let Some(id) = &id {
        return Some(PathStep::terminal(format!(
            "{node_name}#{}",
            escape_identifier(id)
        )));
    }

    let parent = match node.parent_node() {
        Some(parent) if parent.kind() != NodeKind::Document => parent,
        _ => return Some(PathStep::terminal(node_name)),
    };

    let own_classes = node.class_list();
    let mut needs_class_names = false;
    let mut needs_nth_child = false;
    let mut own_index = None;
    let mut element_index = 0usize;

    for sibling in parent.element_children() {
        if own_index.is_some() && needs_nth_child {
            break;
        }
        element_index += 1;
        if sibling == *node {
            own_index = Some(element_index);
            continue;
        }
        if needs_nth_child || !sibling.node_name().eq_ignore_ascii_case(&node_name) {
            continue;
        }

        needs_class_names = true;
        // Every same-named sibling is checked against the full own class set
        let mut remaining: Vec<&String> = own_classes.iter().collect();
        if remaining.is_empty() {
            needs_nth_child = true;
            continue;
        }
        for class in sibling.class_list() {
            remaining.retain(|own| **own != class);
            if remaining.is_empty() {
                needs_nth_child = true;
                break;
            }
        }
    }

    // Not among its parent's children: the tree is inconsistent
    let own_index = own_index?;

    let mut value = node_name.clone();
    let classless = node.attribute("class").is_none_or(|c| c.is_empty());
    if is_target && classless && node_name.eq_ignore_ascii_case("input") {
        if let Some(kind) = node.attribute("type").filter(|t| !t.is_empty()) {
            value.push_str(&format!("[type=\"{}\"]", escape_attr_value(&kind)));
        }
    }

    if needs_nth_child {
        value.push_str(&format!(":nth-child({own_index})"));
    } else if needs_class_names {
        for class in &own_classes {
            value.push('.');
            value.push_str(&escape_identifier(class));
        }
    }

    Some(PathStep::new(value, false))
}

fn escape_attr_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
