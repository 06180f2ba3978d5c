//! outerHTML / textContent

use crate::node::{Namespace, NodeData};
use crate::{DomTree, NodeId};

/// Elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Raw-text elements whose text children are emitted unescaped
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "xmp", "iframe", "noembed", "noframes"];

/// Serialize `id` and its subtree as HTML (DOM `outerHTML`).
pub fn outer_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, false, &mut out);
    out
}

/// Concatenated character data below `id` (DOM `textContent`).
///
/// Comments and processing instructions contribute nothing, except when
/// `id` itself is one of them.
pub fn text_content(tree: &DomTree, id: NodeId) -> String {
    match tree.get(id).map(|n| &n.data) {
        None | Some(NodeData::Document) | Some(NodeData::Doctype { .. }) => String::new(),
        Some(NodeData::Text(t)) | Some(NodeData::CData(t)) | Some(NodeData::Comment(t)) => {
            t.clone()
        }
        Some(NodeData::ProcessingInstruction { data, .. }) => data.clone(),
        Some(NodeData::Attribute { value, .. }) => value.clone(),
        Some(NodeData::Element(_)) => tree
            .descendants(id)
            .filter_map(|(_, node)| node.as_text())
            .collect(),
    }
}

fn write_node(tree: &DomTree, id: NodeId, raw_text: bool, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Document => {
            for (child, _) in tree.children(id) {
                write_node(tree, child, false, out);
            }
        }
        NodeData::Doctype { name, .. } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeData::Element(elem) => {
            out.push('<');
            out.push_str(&elem.local_name);
            for attr in &elem.attrs {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape_into(&attr.value, true, out);
                out.push('"');
            }
            out.push('>');

            let is_html = elem.namespace == Namespace::Html;
            if is_html && VOID_ELEMENTS.contains(&elem.local_name.as_str()) {
                return;
            }
            let raw = is_html && RAW_TEXT_ELEMENTS.contains(&elem.local_name.as_str());
            for (child, _) in tree.children(id) {
                write_node(tree, child, raw, out);
            }

            out.push_str("</");
            out.push_str(&elem.local_name);
            out.push('>');
        }
        NodeData::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                escape_into(text, false, out);
            }
        }
        NodeData::CData(text) => {
            out.push_str("<![CDATA[");
            out.push_str(text);
            out.push_str("]]>");
        }
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::ProcessingInstruction { target, data } => {
            out.push_str("<?");
            out.push_str(target);
            out.push(' ');
            out.push_str(data);
            out.push('>');
        }
        NodeData::Attribute { value, .. } => escape_into(value, true, out),
    }
}

fn escape_into(text: &str, attr_mode: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attr_mode => out.push_str("&quot;"),
            '<' if !attr_mode => out.push_str("&lt;"),
            '>' if !attr_mode => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.set_attribute(div, "class", "a \"b\"");
        let text = tree.create_text("1 < 2 & ");
        let br = tree.create_element("br");
        let em = tree.create_element("em");
        let inner = tree.create_text("yes");
        let comment = tree.create_comment("note");
        tree.append_child(tree.root(), div);
        tree.append_child(div, text);
        tree.append_child(div, br);
        tree.append_child(div, em);
        tree.append_child(em, inner);
        tree.append_child(div, comment);
        (tree, div)
    }

    #[test]
    fn test_outer_html() {
        let (tree, div) = sample();
        assert_eq!(
            outer_html(&tree, div),
            "<div class=\"a &quot;b&quot;\">1 &lt; 2 &amp; <br><em>yes</em><!--note--></div>"
        );
    }

    #[test]
    fn test_text_content_skips_comments() {
        let (tree, div) = sample();
        assert_eq!(text_content(&tree, div), "1 < 2 & yes");
    }

    #[test]
    fn test_script_text_is_raw() {
        let mut tree = DomTree::new();
        let script = tree.create_element("script");
        let code = tree.create_text("if (a < b) {}");
        tree.append_child(tree.root(), script);
        tree.append_child(script, code);
        assert_eq!(outer_html(&tree, script), "<script>if (a < b) {}</script>");
    }
}
