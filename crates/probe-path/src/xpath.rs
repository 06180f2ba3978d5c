//! XPath builder

use crate::node_view::{NodeKind, TreeNode};
use crate::step::PathStep;

/// Build an absolute XPath for `node`.
///
/// The document itself is `/`. Positional predicates are added only when
/// the node has similar siblings. With `optimized` set an element carrying
/// an id short-circuits to `//*[@id="..."]`.
pub fn xpath<N: TreeNode>(node: &N, optimized: bool) -> String {
    if node.kind() == NodeKind::Document {
        return "/".to_string();
    }

    let mut steps: Vec<PathStep> = Vec::new();
    let mut current = Some(node.clone());
    while let Some(context) = current {
        let Some(step) = xpath_step(&context, optimized) else {
            break;
        };
        let stop = step.optimized;
        steps.push(step);
        if stop {
            break;
        }
        current = context.parent_node();
    }

    steps.reverse();
    let prefix = match steps.first() {
        Some(first) if first.optimized => "",
        _ => "/",
    };
    let joined: Vec<&str> = steps.iter().map(|s| s.value.as_str()).collect();
    format!("{prefix}{}", joined.join("/"))
}

fn xpath_step<N: TreeNode>(node: &N, optimized: bool) -> Option<PathStep> {
    let index = xpath_index(node)?;

    let mut value = match node.kind() {
        NodeKind::Element => {
            if optimized {
                if let Some(step) = node.element_id().and_then(|id| id_shortcut(&id)) {
                    return Some(PathStep::terminal(step));
                }
            }
            node.local_name().unwrap_or_default()
        }
        NodeKind::Attribute => format!("@{}", node.node_name()),
        NodeKind::Text | NodeKind::CData => "text()".to_string(),
        NodeKind::ProcessingInstruction => "processing-instruction()".to_string(),
        NodeKind::Comment => "comment()".to_string(),
        NodeKind::Document | NodeKind::Other => String::new(),
    };

    if index > 0 {
        value.push_str(&format!("[{index}]"));
    }
    Some(PathStep::new(value, node.kind() == NodeKind::Document))
}

/// `//*[@id="..."]`, or `None` when the id holds both quote kinds and has
/// no XPath 1.0 literal form.
fn id_shortcut(id: &str) -> Option<String> {
    if !id.contains('"') {
        Some(format!("//*[@id=\"{id}\"]"))
    } else if !id.contains('\'') {
        Some(format!("//*[@id='{id}']"))
    } else {
        None
    }
}

fn similar<N: TreeNode>(left: &N, right: &N) -> bool {
    if left == right {
        return true;
    }
    match (left.kind(), right.kind()) {
        (NodeKind::Element, NodeKind::Element) => left.local_name() == right.local_name(),
        (l, r) => l.sibling_category() == r.sibling_category(),
    }
}

/// 1-based position among similar siblings, `Some(0)` when no predicate is
/// needed, `None` when the node is missing from its parent's child list.
fn xpath_index<N: TreeNode>(node: &N) -> Option<usize> {
    if node.kind() == NodeKind::Attribute {
        return Some(0);
    }
    let Some(parent) = node.parent_node() else {
        return Some(0);
    };

    let siblings = parent.child_nodes();
    let has_similar = siblings.iter().any(|s| s != node && similar(node, s));
    if !has_similar {
        return Some(0);
    }

    let mut own_index = 1;
    for sibling in &siblings {
        if similar(node, sibling) {
            if sibling == node {
                return Some(own_index);
            }
            own_index += 1;
        }
    }
    None
}
