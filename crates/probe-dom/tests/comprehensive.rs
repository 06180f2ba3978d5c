//! Comprehensive tests for probe-dom
//!
//! Tree building, traversal and serialization working together.

use probe_dom::{Document, DomTree, NodeData, NodeId, outer_html, text_content};

#[test]
fn test_dom_tree_creation() {
    let mut tree = DomTree::new();

    // Create a simple structure: div > span > text
    let div = tree.create_element("div");
    let span = tree.create_element("span");
    let text = tree.create_text("Hello, World!");

    tree.append_child(tree.root(), div);
    tree.append_child(div, span);
    tree.append_child(span, text);

    // Verify structure
    assert_eq!(tree.len(), 4); // root + div + span + text

    let div_node = tree.get(div).unwrap();
    assert_eq!(div_node.parent, tree.root());
    assert_eq!(div_node.first_child, span);

    let span_node = tree.get(span).unwrap();
    assert_eq!(span_node.parent, div);
    assert_eq!(span_node.first_child, text);
}

#[test]
fn test_dom_tree_siblings() {
    let mut tree = DomTree::new();

    let div = tree.create_element("div");
    let child1 = tree.create_element("p");
    let child2 = tree.create_element("p");
    let child3 = tree.create_element("p");

    tree.append_child(tree.root(), div);
    tree.append_child(div, child1);
    tree.append_child(div, child2);
    tree.append_child(div, child3);

    // Verify sibling chain
    let node1 = tree.get(child1).unwrap();
    assert_eq!(node1.next_sibling, child2);
    assert!(!node1.prev_sibling.is_valid());

    let node3 = tree.get(child3).unwrap();
    assert_eq!(node3.prev_sibling, child2);
    assert!(!node3.next_sibling.is_valid());
}

#[test]
fn test_mixed_node_kinds() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let pi = tree.create_processing_instruction("xml-stylesheet", "href=\"a.css\"");
    let doctype = tree.create_doctype("html", "", "");
    let html = tree.create_element("html");
    let cdata = tree.create_cdata("raw <data>");
    tree.append_child(root, pi);
    tree.append_child(root, doctype);
    tree.append_child(root, html);
    tree.append_child(html, cdata);

    let kinds: Vec<_> = tree
        .descendants(root)
        .map(|(_, node)| match node.data {
            NodeData::ProcessingInstruction { .. } => "pi",
            NodeData::Doctype { .. } => "doctype",
            NodeData::Element(_) => "element",
            NodeData::CData(_) => "cdata",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["pi", "doctype", "element", "cdata"]);
    assert_eq!(text_content(&tree, html), "raw <data>");
    assert_eq!(outer_html(&tree, html), "<html><![CDATA[raw <data>]]></html>");
}

#[test]
fn test_invalid_ids_are_ignored() {
    let mut tree = DomTree::new();
    let bogus = NodeId::from_index(999);

    assert!(tree.get(bogus).is_none());
    assert!(!tree.append_child(bogus, tree.root()));
    assert!(!tree.set_attribute(bogus, "id", "x"));
    assert_eq!(tree.children(bogus).count(), 0);
    assert_eq!(tree.descendants(NodeId::NONE).count(), 0);
}

#[test]
fn test_form_values_survive_attribute_changes() {
    let mut doc = Document::new("https://example.com/");
    let body = doc.body();
    let tree = doc.tree_mut();
    let input = tree.create_element("input");
    tree.set_attribute(input, "value", "default");
    tree.append_child(body, input);

    tree.set_value(input, "filled");
    tree.set_attribute(input, "value", "changed default");
    let elem = tree.get(input).unwrap().as_element().unwrap();
    assert_eq!(elem.current_value(), Some("filled"));

    tree.reset_value(input);
    let elem = tree.get(input).unwrap().as_element().unwrap();
    assert_eq!(elem.current_value(), Some("changed default"));
}

#[test]
fn test_large_flat_tree_traversal() {
    let mut tree = DomTree::new();
    let ul = tree.create_element("ul");
    tree.append_child(tree.root(), ul);
    for _ in 0..1000 {
        let li = tree.create_element("li");
        tree.append_child(ul, li);
    }

    assert_eq!(tree.element_children(ul).count(), 1000);
    assert_eq!(tree.descendants(tree.root()).count(), 1001);
}
