use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HoogleError {
    /// Symbol discovery could not enumerate the root namespace.
    #[error("Failed to discover modules under {root}: {reason}")]
    Discovery { root: String, reason: String },

    /// A documentation page could not be retrieved or decoded.
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The documentation server answered with a non-success status.
    #[error("Failed to fetch {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// A module page has no `h1` title to anchor the preamble on.
    #[error("Page has no title heading")]
    MissingTitle,

    /// A `pre` block whose first child is not text.
    #[error("Preformatted block does not start with text")]
    MalformedPreformatted,

    #[error("Invalid exclusion pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Writing the output database failed.
    #[error("Failed to write output {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, HoogleError>;
