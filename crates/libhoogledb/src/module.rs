use std::fmt;

use tracing::info;

use crate::{
    comment::{substitute_placeholder, to_doc_comment},
    dom::{DocPage, Element},
    error::{HoogleError, Result},
    members::{extract_module_members, render_entry},
    render::Renderer,
};

/// Heading text that ends the module preamble.
const IMPORTS_HEADING: &str = "Imports";

/// A dot-separated qualified module name such as `frege.data.List`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleName(String);

impl ModuleName {
    /// Wrap a qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The qualified name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The slash-separated documentation path, e.g. `frege/data/List`.
    pub fn path(&self) -> String {
        self.0.split('.').collect::<Vec<_>>().join("/")
    }

    /// The module's documentation URL under `base_url`, without the `.html` suffix.
    ///
    /// Anchors and permalinks are built from this URL.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.path())
    }

    /// The URL of the module's documentation page.
    pub fn page_url(&self, base_url: &str) -> String {
        format!("{}.html", self.url(base_url))
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ModuleName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Render a complete module block: preamble comment, `module` header, and every member entry.
///
/// Nothing is returned on error, so a failing module never contributes partial output.
pub fn render_module(name: &ModuleName, page: &DocPage, base_url: &str) -> Result<String> {
    let renderer = Renderer::new(name.url(base_url));
    let mut out = String::new();

    let preamble = to_doc_comment(&substitute_placeholder(&render_preamble(page, &renderer)?));
    if !preamble.is_empty() {
        out.push_str(&preamble);
        out.push('\n');
    }
    out.push_str(&format!("module {name}\n\n"));

    let entries = extract_module_members(page);
    if entries.is_empty() {
        info!(module = %name, "no declaration list found");
    }
    for entry in &entries {
        for item in entry.flatten() {
            for line in render_entry(item, &renderer)? {
                out.push_str(&line);
                out.push('\n');
            }
        }
    }
    Ok(out)
}

/// Render the elements between the page title and the `Imports` heading.
fn render_preamble(page: &DocPage, renderer: &Renderer) -> Result<String> {
    let siblings = page
        .following_siblings(&|e| e.name == "h1")
        .ok_or(HoogleError::MissingTitle)?;
    let mut out = String::new();
    for element in siblings.into_iter().take_while(|e| !is_imports(e)) {
        out.push_str(&renderer.render_element(element)?);
    }
    Ok(out)
}

fn is_imports(element: &Element) -> bool {
    element.name == "h3" && element.text().trim() == IMPORTS_HEADING
}
