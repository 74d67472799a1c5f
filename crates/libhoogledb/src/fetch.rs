//! Retrieval of documentation pages.
//!
//! Every fetcher hands back a parsed [`DocPage`] with its line breaks already marked.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::blocking::Client;
use tracing::debug;

use crate::{
    dom::DocPage,
    error::{HoogleError, Result},
};

/// User agent sent with documentation requests.
const USER_AGENT: &str = concat!("hoogledb/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout for documentation pages.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Retrieves and parses a documentation page.
pub trait Fetch {
    /// Fetch the page at `url`.
    fn fetch(&self, url: &str) -> Result<DocPage>;
}

/// Fetches pages over HTTP(S) with a blocking client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the default user agent and timeout.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<DocPage> {
        debug!(url, "fetching page");
        let response = self.client.get(url).send().map_err(|e| HoogleError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(HoogleError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        DocPage::parse(response).map_err(|e| HoogleError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Reads pages from the local file system.
///
/// Accepts `file://` URLs as well as plain paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl FileFetcher {
    /// The file a URL refers to.
    pub fn path_for(url: &str) -> PathBuf {
        PathBuf::from(url.strip_prefix("file://").unwrap_or(url))
    }
}

impl Fetch for FileFetcher {
    fn fetch(&self, url: &str) -> Result<DocPage> {
        let path = Self::path_for(url);
        debug!(path = %path.display(), "reading page");
        let fetch_error = |e: io::Error| HoogleError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        };
        let file = File::open(&path).map_err(fetch_error)?;
        DocPage::parse(BufReader::new(file)).map_err(|e| HoogleError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Serves pre-parsed pages from memory, keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, DocPage>,
}

impl StaticFetcher {
    /// An empty fetcher; every fetch fails until pages are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page for `url`.
    pub fn with_page(mut self, url: impl Into<String>, page: DocPage) -> Self {
        self.pages.insert(url.into(), page);
        self
    }

    /// Parse `html` and register it for `url`.
    pub fn with_html(self, url: impl Into<String>, html: &str) -> Result<Self> {
        Ok(self.with_page(url, DocPage::parse_str(html)?))
    }
}

impl Fetch for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<DocPage> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| HoogleError::Fetch {
                url: url.to_string(),
                reason: "page not found".to_string(),
            })
    }
}

/// Choose a fetcher for a documentation base URL: HTTP(S) URLs go over the network,
/// everything else is read from disk.
pub fn fetcher_for(base_url: &str) -> Result<Box<dyn Fetch>> {
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        Ok(Box::new(HttpFetcher::new()?))
    } else {
        Ok(Box::new(FileFetcher))
    }
}

/// Turn a local documentation directory into a `file://` base URL.
pub fn file_base_url(dir: &Path) -> String {
    format!("file://{}", dir.display())
}
