//! CSS selector matching
//!
//! A small selector engine over [`TreeNode`]: compound selectors (type,
//! universal, id, class, attribute matchers, structural pseudo-classes)
//! joined by child or descendant combinators, and comma-separated lists.
//! Enough to resolve the paths [`crate::css_path`] emits and the queries the
//! collection helpers run.

use std::collections::HashMap;

use crate::node_view::{NodeKind, TreeNode};

/// Pseudo-class type
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    // Tree-structural pseudo-classes
    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    NthOfType(NthExpression),
    NthLastOfType(NthExpression),

    // Logical pseudo-classes
    Not(Box<SelectorComponent>),
}

impl PseudoClass {
    fn parse(name: &str, arg: Option<&str>) -> Option<Self> {
        let pseudo = match (name.to_ascii_lowercase().as_str(), arg) {
            ("root", None) => Self::Root,
            ("empty", None) => Self::Empty,
            ("first-child", None) => Self::FirstChild,
            ("last-child", None) => Self::LastChild,
            ("only-child", None) => Self::OnlyChild,
            ("first-of-type", None) => Self::FirstOfType,
            ("last-of-type", None) => Self::LastOfType,
            ("only-of-type", None) => Self::OnlyOfType,
            ("nth-child", Some(arg)) => Self::NthChild(NthExpression::parse(arg)?),
            ("nth-last-child", Some(arg)) => Self::NthLastChild(NthExpression::parse(arg)?),
            ("nth-of-type", Some(arg)) => Self::NthOfType(NthExpression::parse(arg)?),
            ("nth-last-of-type", Some(arg)) => Self::NthLastOfType(NthExpression::parse(arg)?),
            ("not", Some(arg)) => {
                let mut compound = Cursor::new(arg.trim()).compound()?;
                if compound.len() != 1 {
                    return None;
                }
                Self::Not(Box::new(compound.remove(0)))
            }
            _ => return None,
        };
        Some(pseudo)
    }
}

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, PartialEq)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    /// Create "odd" expression (2n+1)
    pub fn odd() -> Self {
        Self { a: 2, b: 1 }
    }

    /// Create "even" expression (2n)
    pub fn even() -> Self {
        Self { a: 2, b: 0 }
    }

    /// Create a simple index (0n+b)
    pub fn index(n: i32) -> Self {
        Self { a: 0, b: n }
    }

    /// Create An+B expression
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse from string like "2n+1", "odd", "even", "3"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "odd" => return Some(Self::odd()),
            "even" => return Some(Self::even()),
            _ => {}
        }

        if let Ok(n) = s.parse::<i32>() {
            return Some(Self::index(n));
        }

        let s = s.replace(' ', "");
        let n_pos = s.find('n')?;
        let a = match &s[..n_pos] {
            "" | "+" => 1,
            "-" => -1,
            a_str => a_str.parse().ok()?,
        };
        let rest = &s[n_pos + 1..];
        let b = if rest.is_empty() { 0 } else { rest.parse().ok()? };

        Some(Self::new(a, b))
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        if self.a == 0 {
            return n == self.b;
        }

        let a = i64::from(self.a);
        let diff = i64::from(n) - i64::from(self.b);
        if a > 0 {
            diff >= 0 && diff % a == 0
        } else {
            diff <= 0 && diff % a == 0
        }
    }
}

/// A component of a compound selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :first-child, :nth-child(), etc.
    PseudoClass(PseudoClass),
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let (Some(matcher), Some(val)) = (&self.matcher, value) else {
            // [attr] only checks existence
            return self.matcher.is_none() && value.is_some();
        };

        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_lowercase()
            } else {
                s.to_string()
            }
        };
        let val = fold(val);

        match matcher {
            AttributeMatcher::Exact(expected) => val == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                val.split_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                val == expected || val.starts_with(&format!("{expected}-"))
            }
            // Empty needles never match
            AttributeMatcher::Prefix(expected) => {
                !expected.is_empty() && val.starts_with(&fold(expected))
            }
            AttributeMatcher::Suffix(expected) => {
                !expected.is_empty() && val.ends_with(&fold(expected))
            }
            AttributeMatcher::Substring(expected) => {
                !expected.is_empty() && val.contains(&fold(expected))
            }
        }
    }
}

/// Element context for selector matching
pub struct ElementContext<'a> {
    /// Tag name
    pub tag_name: &'a str,
    /// ID attribute
    pub id: Option<&'a str>,
    /// Class list
    pub classes: &'a [String],
    /// Attributes
    pub attributes: &'a HashMap<String, String>,
    /// Index among siblings (1-based)
    pub sibling_index: usize,
    /// Total siblings count
    pub sibling_count: usize,
    /// Index among same-type siblings (1-based)
    pub type_index: usize,
    /// Total same-type siblings count
    pub type_count: usize,
    pub is_root: bool,
    pub is_empty: bool,
}

/// Match a selector component against an element
pub fn match_component(component: &SelectorComponent, element: &ElementContext) -> bool {
    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => element.tag_name.eq_ignore_ascii_case(tag),
        SelectorComponent::Id(id) => element.id == Some(id.as_str()),
        SelectorComponent::Class(class) => element.classes.iter().any(|c| c == class),
        SelectorComponent::Attribute(attr) => {
            attr.matches(element.attributes.get(&attr.name).map(|s| s.as_str()))
        }
        SelectorComponent::PseudoClass(pseudo) => match_pseudo_class(pseudo, element),
    }
}

/// Match a pseudo-class against an element
pub fn match_pseudo_class(pseudo: &PseudoClass, element: &ElementContext) -> bool {
    match pseudo {
        PseudoClass::Root => element.is_root,
        PseudoClass::Empty => element.is_empty,
        PseudoClass::FirstChild => element.sibling_index == 1,
        PseudoClass::LastChild => element.sibling_index == element.sibling_count,
        PseudoClass::OnlyChild => element.sibling_count == 1,
        PseudoClass::FirstOfType => element.type_index == 1,
        PseudoClass::LastOfType => element.type_index == element.type_count,
        PseudoClass::OnlyOfType => element.type_count == 1,
        PseudoClass::NthChild(expr) => expr.matches(element.sibling_index as i32),
        PseudoClass::NthLastChild(expr) => {
            let from_end = element.sibling_count - element.sibling_index + 1;
            expr.matches(from_end as i32)
        }
        PseudoClass::NthOfType(expr) => expr.matches(element.type_index as i32),
        PseudoClass::NthLastOfType(expr) => {
            let from_end = element.type_count - element.type_index + 1;
            expr.matches(from_end as i32)
        }
        PseudoClass::Not(component) => !match_component(component, element),
    }
}

/// Owned data behind an [`ElementContext`]
struct ContextData {
    tag_name: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    sibling_index: usize,
    sibling_count: usize,
    type_index: usize,
    type_count: usize,
    is_root: bool,
    is_empty: bool,
}

impl ContextData {
    fn from_node<N: TreeNode>(node: &N) -> Self {
        let tag_name = node.tag().unwrap_or_default();
        let parent = node.parent_node();
        let siblings = parent.as_ref().map(|p| p.element_children()).unwrap_or_default();

        let (mut sibling_index, mut type_index, mut type_count) = (1, 1, 0);
        let mut seen_self = false;
        for sibling in &siblings {
            let same_type = sibling.tag().as_deref() == Some(tag_name.as_str());
            if sibling == node {
                seen_self = true;
                type_count += 1;
                continue;
            }
            if !seen_self {
                sibling_index += 1;
                if same_type {
                    type_index += 1;
                }
            }
            if same_type {
                type_count += 1;
            }
        }
        let sibling_count = siblings.len().max(1);

        let is_empty = !node.child_nodes().iter().any(|c| {
            matches!(c.kind(), NodeKind::Element | NodeKind::Text | NodeKind::CData)
        });

        Self {
            id: node.element_id(),
            classes: node.class_list(),
            attributes: node.attributes().into_iter().collect(),
            sibling_index,
            sibling_count,
            type_index,
            type_count: type_count.max(1),
            is_root: parent.is_some_and(|p| p.kind() == NodeKind::Document),
            is_empty,
            tag_name,
        }
    }

    fn context(&self) -> ElementContext<'_> {
        ElementContext {
            tag_name: &self.tag_name,
            id: self.id.as_deref(),
            classes: &self.classes,
            attributes: &self.attributes,
            sibling_index: self.sibling_index,
            sibling_count: self.sibling_count,
            type_index: self.type_index,
            type_count: self.type_count,
            is_root: self.is_root,
            is_empty: self.is_empty,
        }
    }
}

/// How two compounds relate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
}

/// Compounds joined by combinators; `combinators[i]` sits between
/// `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<Vec<SelectorComponent>>,
    pub combinators: Vec<Combinator>,
}

impl ComplexSelector {
    pub fn matches<N: TreeNode>(&self, node: &N) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_from(n - 1, node),
        }
    }

    fn matches_from<N: TreeNode>(&self, index: usize, node: &N) -> bool {
        if !node.is_element() {
            return false;
        }
        let data = ContextData::from_node(node);
        let ctx = data.context();
        if !self.compounds[index].iter().all(|c| match_component(c, &ctx)) {
            return false;
        }
        if index == 0 {
            return true;
        }

        match self.combinators[index - 1] {
            Combinator::Child => node
                .parent_node()
                .is_some_and(|parent| self.matches_from(index - 1, &parent)),
            Combinator::Descendant => {
                let mut ancestor = node.parent_node();
                while let Some(current) = ancestor {
                    if self.matches_from(index - 1, &current) {
                        return true;
                    }
                    ancestor = current.parent_node();
                }
                false
            }
        }
    }
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(pub Vec<ComplexSelector>);

impl SelectorList {
    /// Parse a selector list; `None` when any part is malformed or
    /// unsupported.
    pub fn parse(input: &str) -> Option<Self> {
        let mut cursor = Cursor::new(input);
        let mut selectors = Vec::new();
        loop {
            selectors.push(cursor.complex()?);
            cursor.skip_whitespace();
            match cursor.next() {
                Some(',') => continue,
                None => break,
                Some(_) => return None,
            }
        }
        Some(Self(selectors))
    }

    pub fn matches<N: TreeNode>(&self, node: &N) -> bool {
        self.0.iter().any(|s| s.matches(node))
    }
}

/// Character cursor for the selector grammar
struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn complex(&mut self) -> Option<ComplexSelector> {
        self.skip_whitespace();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return None,
            };
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }

        Some(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> Option<Vec<SelectorComponent>> {
        let mut components = Vec::new();
        while let Some(c) = self.peek() {
            let component = match c {
                '*' => {
                    self.pos += 1;
                    SelectorComponent::Universal
                }
                '#' => {
                    self.pos += 1;
                    SelectorComponent::Id(self.ident()?)
                }
                '.' => {
                    self.pos += 1;
                    SelectorComponent::Class(self.ident()?)
                }
                '[' => {
                    self.pos += 1;
                    SelectorComponent::Attribute(self.attribute()?)
                }
                ':' => {
                    self.pos += 1;
                    SelectorComponent::PseudoClass(self.pseudo_class()?)
                }
                c if c.is_whitespace() || c == '>' || c == ',' => break,
                _ => SelectorComponent::Type(self.ident()?.to_ascii_lowercase()),
            };
            components.push(component);
        }
        (!components.is_empty()).then_some(components)
    }

    fn ident(&mut self) -> Option<String> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                out.push(self.escape()?);
            } else if crate::is_css_ident_char(c) {
                self.pos += 1;
                out.push(c);
            } else {
                break;
            }
        }
        (!out.is_empty()).then_some(out)
    }

    /// Body of a `\` escape: up to six hex digits and one optional
    /// whitespace, or a single literal character.
    fn escape(&mut self) -> Option<char> {
        let mut hex = String::new();
        while hex.len() < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            hex.extend(self.next());
        }
        if hex.is_empty() {
            return self.next();
        }
        if self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        let code = u32::from_str_radix(&hex, 16).ok()?;
        Some(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn string(&mut self, quote: char) -> Option<String> {
        let mut out = String::new();
        loop {
            match self.next()? {
                c if c == quote => return Some(out),
                '\\' => out.push(self.escape()?),
                c => out.push(c),
            }
        }
    }

    fn attribute(&mut self) -> Option<AttributeSelector> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        if self.eat(']') {
            return Some(AttributeSelector {
                name,
                matcher: None,
                case_insensitive: false,
            });
        }

        let op = match self.next()? {
            '=' => None,
            op @ ('~' | '|' | '^' | '$' | '*') => {
                if !self.eat('=') {
                    return None;
                }
                Some(op)
            }
            _ => return None,
        };
        self.skip_whitespace();
        let value = match self.peek()? {
            q @ ('"' | '\'') => {
                self.pos += 1;
                self.string(q)?
            }
            _ => self.ident()?,
        };
        self.skip_whitespace();
        let case_insensitive = if self.eat('i') || self.eat('I') {
            true
        } else {
            let _ = self.eat('s') || self.eat('S');
            false
        };
        self.skip_whitespace();
        if !self.eat(']') {
            return None;
        }

        let matcher = match op {
            None => AttributeMatcher::Exact(value),
            Some('~') => AttributeMatcher::Contains(value),
            Some('|') => AttributeMatcher::DashMatch(value),
            Some('^') => AttributeMatcher::Prefix(value),
            Some('$') => AttributeMatcher::Suffix(value),
            _ => AttributeMatcher::Substring(value),
        };
        Some(AttributeSelector {
            name,
            matcher: Some(matcher),
            case_insensitive,
        })
    }

    fn pseudo_class(&mut self) -> Option<PseudoClass> {
        let name = self.ident()?;
        let arg = if self.eat('(') {
            let start = self.pos;
            let mut depth = 1;
            while depth > 0 {
                match self.next()? {
                    '(' => depth += 1,
                    ')' => depth -= 1,
                    _ => {}
                }
            }
            Some(self.chars[start..self.pos - 1].iter().collect::<String>())
        } else {
            None
        };
        PseudoClass::parse(&name, arg.as_deref())
    }
}

fn collect_descendants<N: TreeNode>(node: &N, selector: &SelectorList, out: &mut Vec<N>) {
    let mut stack: Vec<N> = node.child_nodes().into_iter().rev().collect();
    while let Some(current) = stack.pop() {
        if current.is_element() && selector.matches(&current) {
            out.push(current.clone());
        }
        stack.extend(current.child_nodes().into_iter().rev());
    }
}

/// All descendant elements of `root` matching `selector`, in document
/// order. A selector that does not parse matches nothing.
pub fn query_selector_all<N: TreeNode>(root: &N, selector: &str) -> Vec<N> {
    let Some(list) = SelectorList::parse(selector) else {
        tracing::debug!("unsupported selector: {:?}", selector);
        return Vec::new();
    };
    let mut out = Vec::new();
    collect_descendants(root, &list, &mut out);
    out
}

/// First descendant element of `root` matching `selector`
pub fn query_selector<N: TreeNode>(root: &N, selector: &str) -> Option<N> {
    query_selector_all(root, selector).into_iter().next()
}

/// Does `node` match `selector`?
pub fn matches_selector<N: TreeNode>(node: &N, selector: &str) -> bool {
    SelectorList::parse(selector).is_some_and(|list| list.matches(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_dom::{DomTree, NodeId};

    fn sample() -> (DomTree, Vec<NodeId>) {
        // <html><body><ul id="list"><li class="a">1</li><li class="b c">2</li>
        // <li data-k="x-y">3</li></ul></body></html>
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        let ul = tree.create_element("ul");
        tree.set_attribute(ul, "id", "list");
        tree.append_child(tree.root(), html);
        tree.append_child(html, body);
        tree.append_child(body, ul);
        let mut items = Vec::new();
        for attrs in [("class", "a"), ("class", "b c"), ("data-k", "x-y")] {
            let li = tree.create_element("li");
            tree.set_attribute(li, attrs.0, attrs.1);
            tree.append_child(ul, li);
            items.push(li);
        }
        (tree, items)
    }

    #[test]
    fn test_nth_expression_odd() {
        let expr = NthExpression::odd();
        assert!(expr.matches(1));
        assert!(!expr.matches(2));
        assert!(expr.matches(3));
    }

    #[test]
    fn test_nth_expression_parse() {
        assert_eq!(NthExpression::parse("odd"), Some(NthExpression::odd()));
        assert_eq!(NthExpression::parse("even"), Some(NthExpression::even()));
        assert_eq!(NthExpression::parse("3"), Some(NthExpression::index(3)));
        assert_eq!(NthExpression::parse("2n+1"), Some(NthExpression::new(2, 1)));
        assert_eq!(NthExpression::parse("-n+3"), Some(NthExpression::new(-1, 3)));
        assert_eq!(NthExpression::parse("x"), None);
    }

    #[test]
    fn test_nth_expression_extreme_offsets() {
        let expr = NthExpression::parse("n-2147483648").unwrap();
        assert!(expr.matches(1));
        assert!(expr.matches(i32::MAX));

        let expr = NthExpression::parse("-n-2147483648").unwrap();
        assert!(!expr.matches(1));

        let expr = NthExpression::parse("-2147483648n+2147483647").unwrap();
        assert!(expr.matches(i32::MAX));
        assert!(!expr.matches(1));

        let (tree, items) = sample();
        let root = tree.node(tree.root());
        let found = query_selector_all(&root, "li:nth-child(n-2147483648)");
        assert_eq!(found.len(), items.len());
    }

    #[test]
    fn test_attribute_selector_exact() {
        let sel = AttributeSelector {
            name: "type".to_string(),
            matcher: Some(AttributeMatcher::Exact("text".to_string())),
            case_insensitive: false,
        };

        assert!(sel.matches(Some("text")));
        assert!(!sel.matches(Some("TEXT")));
        assert!(!sel.matches(None));
    }

    #[test]
    fn test_parse_shapes() {
        let list = SelectorList::parse("div.a > p, #x span").unwrap();
        assert_eq!(list.0.len(), 2);
        assert_eq!(list.0[0].combinators, vec![Combinator::Child]);
        assert_eq!(list.0[1].combinators, vec![Combinator::Descendant]);
        assert_eq!(
            list.0[0].compounds[0],
            vec![
                SelectorComponent::Type("div".into()),
                SelectorComponent::Class("a".into())
            ]
        );

        for bad in ["", "div >", "a + b", "[x", ":hover", "p,"] {
            assert!(SelectorList::parse(bad).is_none(), "{bad}");
        }
    }

    #[test]
    fn test_escaped_identifiers() {
        let list = SelectorList::parse("#\\31 st.a\\2e b").unwrap();
        assert_eq!(
            list.0[0].compounds[0],
            vec![
                SelectorComponent::Id("1st".into()),
                SelectorComponent::Class("a.b".into())
            ]
        );
    }

    #[test]
    fn test_query_selector_all() {
        let (tree, items) = sample();
        let root = tree.node(tree.root());

        let ids = |sel: &str| -> Vec<NodeId> {
            query_selector_all(&root, sel).iter().map(|n| n.id()).collect()
        };

        assert_eq!(ids("li"), items);
        assert_eq!(ids("LI.b"), vec![items[1]]);
        assert_eq!(ids("#list > li:nth-child(2)"), vec![items[1]]);
        assert_eq!(ids("body li:last-child"), vec![items[2]]);
        assert_eq!(ids("[data-k|=x]"), vec![items[2]]);
        assert_eq!(ids("li:not(.a)"), vec![items[1], items[2]]);
        assert_eq!(ids(".c, .a"), vec![items[0], items[1]]);
        assert_eq!(ids("html > li"), Vec::<NodeId>::new());
        assert_eq!(ids(":root").len(), 1);
        assert!(ids("li:hover").is_empty());
    }

    #[test]
    fn test_query_in_deep_tree() {
        let mut tree = DomTree::new();
        let mut parent = tree.root();
        for _ in 0..10_000 {
            let div = tree.create_element("div");
            tree.append_child(parent, div);
            parent = div;
        }
        let leaf = tree.create_element("span");
        tree.append_child(parent, leaf);

        let root = tree.node(tree.root());
        let found: Vec<NodeId> = query_selector_all(&root, "span").iter().map(|n| n.id()).collect();
        assert_eq!(found, vec![leaf]);
    }

    #[test]
    fn test_matches_selector() {
        let (tree, items) = sample();
        let li = tree.node(items[0]);
        assert!(matches_selector(&li, "ul#list li.a:first-of-type"));
        assert!(!matches_selector(&li, "ol li"));
    }
}
