//! A small owned DOM used by the extraction pipeline.
//!
//! Pages are parsed with html5ever into an `RcDom` and then copied into the immutable [`Node`]
//! tree below. Comments, doctypes and processing instructions are dropped during the copy; they
//! never contribute text to the output.

use std::io::Read;

use html5ever::{
    driver::ParseOpts, parse_document, tendril::TendrilSink, tree_builder::TreeBuilderOpts,
};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::{comment::NEWLINE_PLACEHOLDER, error::Result};

/// Element names that jsoup-style text extraction treats as block boundaries.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "div", "dl", "dt", "fieldset",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "html", "li",
    "main", "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th", "thead",
    "tr", "ul",
];

/// A node of a parsed documentation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// The untagged document root.
    Document(Vec<Node>),
    /// A tagged element.
    Element(Element),
    /// Literal character data, entity-decoded.
    Text(String),
}

/// An element with its attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-case local tag name.
    pub name: String,
    /// Attributes as `(name, value)` pairs, in source order.
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element without attributes.
    pub fn new(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children,
        }
    }

    /// Add an attribute, keeping insertion order.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the whitespace-separated `class` attribute contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Element children only, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First element (self included) in document order that satisfies `pred`.
    pub fn find(&self, pred: &dyn Fn(&Self) -> bool) -> Option<&Self> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(pred))
    }

    /// Normalised text content of this element and its descendants.
    ///
    /// Whitespace runs collapse to a single space, block elements and `br` separate their
    /// neighbours with a space, and the result is trimmed.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        collect_text(&self.children, &mut raw);
        normalize_whitespace(&raw).trim().to_string()
    }
}

impl Node {
    /// Shorthand for a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// The element, when this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Children of an element or document; text has none.
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Document(children) => children,
            Self::Element(element) => &element.children,
            Self::Text(_) => &[],
        }
    }

    /// First element at or below this node that satisfies `pred`.
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        match self {
            Self::Element(element) => element.find(pred),
            Self::Document(children) => children.iter().find_map(|child| child.find(pred)),
            Self::Text(_) => None,
        }
    }

    /// Parent-aware search: the sibling list that directly contains the first matching element,
    /// together with the match's index in it.
    fn find_in_siblings(&self, pred: &dyn Fn(&Element) -> bool) -> Option<(&[Self], usize)> {
        let children = self.children();
        for (idx, child) in children.iter().enumerate() {
            if child.as_element().is_some_and(pred) {
                return Some((children, idx));
            }
            if let Some(found) = child.find_in_siblings(pred) {
                return Some(found);
            }
        }
        None
    }
}

/// Select predicate for `tag.class`.
pub fn tag_with_class<'a>(tag: &'a str, class: &'a str) -> impl Fn(&Element) -> bool + 'a {
    move |element| element.name == tag && element.has_class(class)
}

/// A parsed documentation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPage {
    /// The document root.
    root: Node,
}

impl DocPage {
    /// Wrap an already-built tree. Line breaks are not marked; see [`DocPage::parse`].
    pub fn from_node(root: Node) -> Self {
        Self { root }
    }

    /// Parse HTML from a reader and mark every `br` with the newline placeholder.
    pub fn parse(mut html: impl Read) -> Result<Self> {
        let parse_options = ParseOpts {
            tree_builder: TreeBuilderOpts {
                drop_doctype: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let dom = parse_document(RcDom::default(), parse_options)
            .from_utf8()
            .read_from(&mut html)?;

        let root = Node::Document(convert_children(&dom.document));
        Ok(Self {
            root: mark_line_breaks(root),
        })
    }

    /// Parse an HTML string.
    pub fn parse_str(html: &str) -> Result<Self> {
        Self::parse(html.as_bytes())
    }

    /// The document root.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// First element in document order that satisfies `pred`.
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        self.root.find(pred)
    }

    /// Element siblings that follow the first element matching `pred`, in document order.
    pub fn following_siblings(&self, pred: &dyn Fn(&Element) -> bool) -> Option<Vec<&Element>> {
        self.root.find_in_siblings(pred).map(|(siblings, idx)| {
            siblings[idx + 1..]
                .iter()
                .filter_map(Node::as_element)
                .collect()
        })
    }
}

/// Copy the children of an html5ever node into owned nodes.
fn convert_children(handle: &Handle) -> Vec<Node> {
    handle.children.borrow().iter().filter_map(convert).collect()
}

/// Copy one html5ever node, dropping node kinds that carry no page content.
fn convert(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Document => Some(Node::Document(convert_children(handle))),
        NodeData::Element { name, attrs, .. } => Some(Node::Element(Element {
            name: name.local.to_string(),
            attrs: attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect(),
            children: convert_children(handle),
        })),
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Doctype { .. }
        | NodeData::Comment { .. }
        | NodeData::ProcessingInstruction { .. } => None,
    }
}

/// Insert a placeholder text node after every `br` element.
fn mark_line_breaks(node: Node) -> Node {
    fn mark(children: Vec<Node>) -> Vec<Node> {
        let mut marked = Vec::with_capacity(children.len());
        for child in children {
            let is_break = child.as_element().is_some_and(|e| e.name == "br");
            marked.push(mark_line_breaks(child));
            if is_break {
                marked.push(Node::text(NEWLINE_PLACEHOLDER));
            }
        }
        marked
    }

    match node {
        Node::Document(children) => Node::Document(mark(children)),
        Node::Element(mut element) => {
            element.children = mark(element.children);
            Node::Element(element)
        }
        text @ Node::Text(_) => text,
    }
}

/// Accumulate descendant text, separating block elements and line breaks with a space.
fn collect_text(children: &[Node], out: &mut String) {
    for child in children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                if element.name == "br" || BLOCK_TAGS.contains(&element.name.as_str()) {
                    out.push(' ');
                }
                collect_text(&element.children, out);
            }
            Node::Document(children) => collect_text(children, out),
        }
    }
}

/// Collapse each run of whitespace into a single space.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}
