use std::fmt::Write;

use crate::{
    dom::{Element, Node, normalize_whitespace},
    error::{HoogleError, Result},
};

/// How the renderer treats a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    /// Character data, emitted as text.
    Text,
    /// Paragraph-like block, introduced by a hard newline.
    Paragraph,
    /// List container, rendered as its children.
    List,
    /// Preformatted code, escaped and wrapped in `<pre>`.
    Preformatted,
    /// Any other element, re-emitted as markup.
    Markup,
    /// Untagged container, rendered as its children.
    Container,
}

/// Tag-name rules that decide each element's [`NodeCategory`].
#[derive(Debug, Clone)]
pub struct RenderRules {
    /// Tags rendered as paragraphs.
    pub paragraphs: Vec<String>,
    /// Tags rendered as bare lists.
    pub lists: Vec<String>,
    /// Tags rendered as preformatted code.
    pub preformatted: Vec<String>,
}

impl Default for RenderRules {
    fn default() -> Self {
        Self {
            paragraphs: ["p", "dt", "dd"].map(String::from).to_vec(),
            lists: vec!["dl".to_string()],
            preformatted: vec!["pre".to_string()],
        }
    }
}

impl RenderRules {
    /// Classify a node.
    pub fn categorize(&self, node: &Node) -> NodeCategory {
        match node {
            Node::Text(_) => NodeCategory::Text,
            Node::Document(_) => NodeCategory::Container,
            Node::Element(element) => self.categorize_element(element),
        }
    }

    fn categorize_element(&self, element: &Element) -> NodeCategory {
        let name = &element.name;
        if name.is_empty() {
            NodeCategory::Container
        } else if self.paragraphs.contains(name) {
            NodeCategory::Paragraph
        } else if self.lists.contains(name) {
            NodeCategory::List
        } else if self.preformatted.contains(name) {
            NodeCategory::Preformatted
        } else {
            NodeCategory::Markup
        }
    }
}

/// Renders page fragments into Hoogle comment text.
///
/// Links are rewritten against the module URL so that they resolve outside the page they came
/// from: `#anchor` becomes `<module url>#anchor` and `./x` or `../x` become relative to the
/// directory holding the module page.
#[derive(Debug, Clone)]
pub struct Renderer {
    /// Documentation URL of the module being rendered, without the `.html` suffix.
    module_url: String,
    /// Category rules.
    rules: RenderRules,
}

impl Renderer {
    /// Create a renderer for the module documented at `module_url`.
    pub fn new(module_url: impl Into<String>) -> Self {
        Self {
            module_url: module_url.into(),
            rules: RenderRules::default(),
        }
    }

    /// Replace the category rules.
    pub fn with_rules(mut self, rules: RenderRules) -> Self {
        self.rules = rules;
        self
    }

    /// The module URL links are rewritten against.
    pub fn module_url(&self) -> &str {
        &self.module_url
    }

    /// Render a node and everything below it.
    pub fn render(&self, node: &Node) -> Result<String> {
        match node {
            Node::Text(text) => Ok(normalize_whitespace(text)),
            Node::Document(children) => self.render_children(children),
            Node::Element(element) => self.render_element(element),
        }
    }

    /// Render an element and everything below it.
    pub fn render_element(&self, element: &Element) -> Result<String> {
        match self.rules.categorize_element(element) {
            NodeCategory::Paragraph => {
                Ok(format!("\n{}", self.render_children(&element.children)?))
            }
            NodeCategory::Preformatted => render_preformatted(element),
            NodeCategory::Markup => self.render_markup(element),
            NodeCategory::List | NodeCategory::Container | NodeCategory::Text => {
                self.render_children(&element.children)
            }
        }
    }

    fn render_children(&self, children: &[Node]) -> Result<String> {
        let mut out = String::new();
        for child in children {
            out.push_str(&self.render(child)?);
        }
        Ok(out)
    }

    fn render_markup(&self, element: &Element) -> Result<String> {
        let inner = self.render_children(&element.children)?;
        let mut attrs = String::new();
        for (key, value) in &element.attrs {
            let value = if key == "href" {
                self.rewrite_href(value)
            } else {
                value.clone()
            };
            write!(attrs, "{key}=\"{value}\" ").expect("write to string");
        }
        Ok(format!("<{0} {attrs}>{inner}</{0}>", element.name))
    }

    /// Make in-page anchors and relative links absolute.
    pub fn rewrite_href(&self, href: &str) -> String {
        if href.starts_with('#') {
            format!("{}{href}", self.module_url)
        } else if href.starts_with('.') {
            let dir = self
                .module_url
                .rfind('/')
                .map_or(self.module_url.as_str(), |idx| &self.module_url[..idx]);
            format!("{dir}/{href}")
        } else {
            href.to_string()
        }
    }
}

fn render_preformatted(element: &Element) -> Result<String> {
    match element.children.first() {
        Some(Node::Text(code)) => Ok(format!("\n<pre>\n{}\n</pre>", escape_html(code))),
        _ => Err(HoogleError::MalformedPreformatted),
    }
}

/// Escape `&`, `<` and `>` as HTML entities.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
