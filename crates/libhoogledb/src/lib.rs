//! hoogledb builds a Hoogle text database from Frege's HTML API documentation.
//!
//! Every module page contributes one block: the module's introductory prose as a doc comment,
//! a `module` header, and one entry per exported declaration with its documentation, an
//! `@url` permalink and the declaration itself. Data types also contribute an entry per
//! constructor and instance member.
//!
//! The pipeline is split into small pieces so each can be driven on its own:
//!
//! - [`SymbolDiscovery`] lists the qualified module names under a root namespace.
//! - [`ExclusionSet`] drops internal modules by regular expression.
//! - [`Fetch`] retrieves and parses a module page into a [`DocPage`].
//! - [`render_module`] turns a page into its output block.
//! - [`Harvester`] ties them together and streams the result into an [`OutputSink`].

mod comment;
mod config;
mod discovery;
mod dom;
mod error;
mod fetch;
mod filter;
mod harvest;
mod members;
mod module;
mod render;
mod sink;

pub use crate::{
    comment::{NEWLINE_PLACEHOLDER, substitute_placeholder, to_doc_comment},
    config::{Config, DEFAULT_BASE_URL, DEFAULT_OUTPUT_FILE, DEFAULT_ROOT_NAMESPACE},
    discovery::{JarDiscovery, ManifestDiscovery, StaticDiscovery, SymbolDiscovery},
    dom::{DocPage, Element, Node},
    error::{HoogleError, Result},
    fetch::{Fetch, FileFetcher, HttpFetcher, StaticFetcher, fetcher_for, file_base_url},
    filter::{DEFAULT_EXCLUSIONS, ExclusionSet},
    harvest::{Harvester, ModuleFailure, Summary},
    members::{
        DeclarationEntry, SIGNATURE_SEPARATOR, extract_module_members, format_declaration,
        pair_items, post_process, render_entry,
    },
    module::{ModuleName, render_module},
    render::{NodeCategory, RenderRules, Renderer, escape_html},
    sink::OutputSink,
};
