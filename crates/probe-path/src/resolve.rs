//! XPath resolution for the paths [`crate::xpath`] emits

use crate::node_view::{NodeKind, TreeNode};

#[derive(Debug, Clone, PartialEq)]
enum StepTest {
    /// Element by local name, or `*`
    Name(String),
    Text,
    Comment,
    ProcessingInstruction,
}

impl StepTest {
    fn accepts<N: TreeNode>(&self, node: &N) -> bool {
        match self {
            Self::Name(name) => {
                node.is_element()
                    && (name == "*"
                        || node
                            .local_name()
                            .is_some_and(|n| n.eq_ignore_ascii_case(name)))
            }
            Self::Text => node.kind().sibling_category() == NodeKind::Text,
            Self::Comment => node.kind() == NodeKind::Comment,
            Self::ProcessingInstruction => node.kind() == NodeKind::ProcessingInstruction,
        }
    }
}

fn parse_step(step: &str) -> Option<(StepTest, usize)> {
    let (test, index) = match step.find('[') {
        Some(open) => {
            let index = step[open..]
                .strip_prefix('[')?
                .strip_suffix(']')?
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&i| i > 0)?;
            (&step[..open], index)
        }
        None => (step, 1),
    };

    let test = match test {
        "text()" => StepTest::Text,
        "comment()" => StepTest::Comment,
        "processing-instruction()" => StepTest::ProcessingInstruction,
        name if !name.is_empty() && !name.starts_with('@') && !name.contains('(') => {
            StepTest::Name(name.to_string())
        }
        _ => return None,
    };
    Some((test, index))
}

/// Split a leading `//*[@id="..."]` shortcut off `path`.
fn split_id_shortcut(path: &str) -> Option<(String, &str)> {
    let rest = path.strip_prefix("//*[@id=")?;
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let rest = &rest[1..];
    let close = rest.find(quote)?;
    let id = rest[..close].to_string();
    let tail = rest[close + 1..].strip_prefix(']')?;
    Some((id, tail))
}

fn top_of<N: TreeNode>(node: &N) -> N {
    let mut top = node.clone();
    while let Some(parent) = top.parent_node() {
        top = parent;
    }
    top
}

/// First element below `node` carrying `id`, in document order.
fn first_with_id<N: TreeNode>(node: &N, id: &str) -> Option<N> {
    let mut stack: Vec<N> = node.child_nodes().into_iter().rev().collect();
    while let Some(current) = stack.pop() {
        if current.is_element() && current.element_id().as_deref() == Some(id) {
            return Some(current);
        }
        stack.extend(current.child_nodes().into_iter().rev());
    }
    None
}

/// Resolve an absolute XPath against the tree containing `node`.
///
/// Supports absolute location paths of element name tests, `text()`,
/// `comment()` and `processing-instruction()` with optional positional
/// predicates, optionally starting from a `//*[@id="..."]` shortcut.
/// Anything else, or a path that selects nothing, yields `None`.
pub fn find_by_xpath<N: TreeNode>(node: &N, path: &str) -> Option<N> {
    let path = path.trim();
    let top = top_of(node);

    let (mut current, rest) = match split_id_shortcut(path) {
        Some((id, tail)) => (first_with_id(&top, &id)?, tail),
        None if top.kind() == NodeKind::Document => (top, path),
        None => {
            // Detached subtree: the first step names the top node itself
            let rest = path.strip_prefix('/')?;
            let (first, tail) = match rest.find('/') {
                Some(slash) => rest.split_at(slash),
                None => (rest, ""),
            };
            let (test, index) = parse_step(first)?;
            if index != 1 || !test.accepts(&top) {
                return None;
            }
            (top, tail)
        }
    };

    let rest = match rest.strip_prefix('/') {
        Some(rest) => rest,
        None if rest.is_empty() => return Some(current),
        None => return None,
    };
    if rest.is_empty() {
        return Some(current);
    }

    for step in rest.split('/') {
        let (test, index) = parse_step(step)?;
        current = current
            .child_nodes()
            .into_iter()
            .filter(|c| test.accepts(c))
            .nth(index - 1)?;
    }
    Some(current)
}
