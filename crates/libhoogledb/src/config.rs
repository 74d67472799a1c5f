use std::path::PathBuf;

use crate::filter::DEFAULT_EXCLUSIONS;

/// Documentation host used when no base URL is given.
pub const DEFAULT_BASE_URL: &str = "http://www.frege-lang.org/doc";

/// Root package of the documented library.
pub const DEFAULT_ROOT_NAMESPACE: &str = "frege";

/// File the database is written to when no output is given.
pub const DEFAULT_OUTPUT_FILE: &str = "frege-hoogle-database.txt";

/// Resolved settings for one database build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the documentation; module pages live at `<base>/<module path>.html`.
    pub base_url: String,
    /// Namespace whose modules are documented.
    pub root_namespace: String,
    /// Regular expressions; any module whose name they match is skipped.
    pub exclusions: Vec<String>,
    /// Output database path.
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            root_namespace: DEFAULT_ROOT_NAMESPACE.to_string(),
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|p| p.to_string()).collect(),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

impl Config {
    /// Set the documentation base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the root namespace.
    pub fn with_root_namespace(mut self, root: impl Into<String>) -> Self {
        self.root_namespace = root.into();
        self
    }

    /// Replace the exclusion patterns.
    pub fn with_exclusions<I, S>(mut self, exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions = exclusions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://www.frege-lang.org/doc");
        assert_eq!(config.root_namespace, "frege");
        assert_eq!(config.exclusions.len(), 2);
        assert_eq!(config.output, PathBuf::from("frege-hoogle-database.txt"));
    }

    #[test]
    fn builders_override() {
        let config = Config::default()
            .with_base_url("file:///srv/doc")
            .with_root_namespace("frege.data")
            .with_exclusions(["Internal"])
            .with_output("out.txt");
        assert_eq!(
            config,
            Config {
                base_url: "file:///srv/doc".to_string(),
                root_namespace: "frege.data".to_string(),
                exclusions: vec!["Internal".to_string()],
                output: PathBuf::from("out.txt"),
            }
        );
    }
}
