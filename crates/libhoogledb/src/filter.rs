use regex::Regex;

use crate::{error::Result, module::ModuleName};

/// Exclusion patterns applied when no others are configured.
///
/// The first drops the compiler, runtime and tooling namespaces, the second the generated
/// version-stamp module.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    r"^frege\.(compiler|run\d?|system|runtime|interpreter|scriptengine|repl||hoogledatabase)\.",
    r"^frege\.Version$",
];

/// A compiled set of exclusion patterns.
///
/// A symbol is excluded when any pattern matches anywhere in its qualified name. Patterns are
/// compiled once and never change afterwards.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    patterns: Vec<Regex>,
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUSIONS).expect("default exclusion patterns compile")
    }
}

impl ExclusionSet {
    /// Compile the given patterns, failing on the first invalid one.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// True when no pattern matches a substring of `symbol`.
    pub fn is_included(&self, symbol: &str) -> bool {
        !self.patterns.iter().any(|p| p.is_match(symbol))
    }

    /// Keep the included names, preserving discovery order.
    pub fn select<I, S>(&self, symbols: I) -> Vec<ModuleName>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        symbols
            .into_iter()
            .map(Into::into)
            .filter(|name| self.is_included(name))
            .map(ModuleName::from)
            .collect()
    }
}
