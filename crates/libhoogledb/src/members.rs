//! Declaration lists and the Hoogle entries rendered from them.
//!
//! A module page lists its exports in a `dl.data` element whose children alternate between a
//! declaration (`dt`) and its documentation (`dd`). Data types nest the same shape in a
//! `dl.func` list for their constructors and instance members.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    comment::{substitute_placeholder, to_doc_comment},
    dom::{DocPage, Element, tag_with_class},
    error::Result,
    render::Renderer,
};

/// The type signature separator used by the documentation.
pub const SIGNATURE_SEPARATOR: char = '∷';

/// Declarations of data types implemented by a native (host runtime) type.
static NATIVE_DATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data.*=.*\snative\s.*$").expect("valid native data pattern"));

/// A declaration paired with its documentation, plus any nested member declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationEntry<'a> {
    /// The declaration item.
    pub decl: &'a Element,
    /// The documentation item; absent for a trailing unpaired declaration.
    pub doc: Option<&'a Element>,
    /// Constructors and instance members declared under this entry.
    pub children: Vec<DeclarationEntry<'a>>,
}

impl<'a> DeclarationEntry<'a> {
    /// Flatten the entry and its children into emission order: parent first, then its
    /// children in document order.
    pub fn flatten(&self) -> Vec<&Self> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }

    /// The `name` of the first named anchor in the declaration, or an empty string.
    pub fn fragment(&self) -> &'a str {
        self.decl
            .find(&|e| e.name == "a" && e.attr("name").is_some())
            .and_then(|anchor| anchor.attr("name"))
            .unwrap_or("")
    }
}

/// Pair consecutive elements into declaration entries without looking for nested lists.
pub fn pair_items<'a>(items: &[&'a Element]) -> Vec<DeclarationEntry<'a>> {
    items
        .chunks(2)
        .map(|pair| DeclarationEntry {
            decl: pair[0],
            doc: pair.get(1).copied(),
            children: Vec::new(),
        })
        .collect()
}

/// Extract the module's top-level entries, each with its nested member entries.
///
/// A page without a `dl.data` list yields no entries.
pub fn extract_module_members(page: &DocPage) -> Vec<DeclarationEntry<'_>> {
    let Some(list) = page.find(&tag_with_class("dl", "data")) else {
        return Vec::new();
    };
    let items: Vec<&Element> = list.child_elements().collect();
    let mut entries = pair_items(&items);
    for entry in &mut entries {
        entry.children = nested_members(entry);
    }
    entries
}

/// Entries of the first `dl.func` list below the declaration, falling back to the
/// documentation where the member list usually lives.
fn nested_members<'a>(entry: &DeclarationEntry<'a>) -> Vec<DeclarationEntry<'a>> {
    let is_func_list = tag_with_class("dl", "func");
    let list = entry
        .decl
        .find(&is_func_list)
        .or_else(|| entry.doc.and_then(|doc| doc.find(&is_func_list)));
    match list {
        Some(list) => {
            let items: Vec<&Element> = list.child_elements().collect();
            pair_items(&items)
        }
        None => Vec::new(),
    }
}

/// Render one entry (without its children) as output lines.
///
/// The lines are the doc comment (if any), the `@url` permalink, one line per declaration
/// chunk, and a trailing blank line.
pub fn render_entry(entry: &DeclarationEntry<'_>, renderer: &Renderer) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    if let Some(doc) = entry.doc {
        let comment = to_doc_comment(&substitute_placeholder(&renderer.render_element(doc)?));
        if !comment.is_empty() {
            lines.push(comment);
        }
    }

    lines.push(substitute_placeholder(&format!(
        "@url {}#{}",
        renderer.module_url(),
        entry.fragment()
    )));

    for chunk in entry.decl.child_elements() {
        let text = chunk.text();
        // Bare anchors carry no text; an empty line would end the entry early.
        if !text.is_empty() {
            lines.push(substitute_placeholder(&format_declaration(&text)));
        }
    }

    lines.push(String::new());
    Ok(lines)
}

/// Format one declaration chunk.
///
/// Operators (a left-hand side without letters) are parenthesised; everything else goes
/// through [`post_process`].
pub fn format_declaration(chunk: &str) -> String {
    if let Some((name, signature)) = chunk.split_once(SIGNATURE_SEPARATOR) {
        let name = name.trim();
        if !signature.is_empty() && !name.chars().any(char::is_alphabetic) {
            return format!("({name}) {SIGNATURE_SEPARATOR} {}", signature.trim_start());
        }
    }
    post_process(chunk)
}

/// Hide the implementation of native data declarations by cutting at the first `=`.
pub fn post_process(chunk: &str) -> String {
    if NATIVE_DATA.is_match(chunk.trim()) {
        chunk.split('=').next().unwrap_or_default().to_string()
    } else {
        chunk.to_string()
    }
}
