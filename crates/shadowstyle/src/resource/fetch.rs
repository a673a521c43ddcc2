//! Fetch capabilities for stylesheet text.
//!
//! The cache never performs I/O itself. It calls a [`StyleFetcher`] injected
//! into the [`StyleRegistry`](crate::StyleRegistry), which allows:
//!
//! - Embedding stylesheets in the binary ([`StaticFetcher`])
//! - Reading them from disk ([`FileFetcher`])
//! - Network or scripted fetchers supplied by the host

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use url::Url;

use crate::style::FetchError;

/// Asynchronous source of stylesheet text.
///
/// Fetchers run on the single thread that drives the cache, so they are not
/// required to be `Send`.
#[async_trait(?Send)]
pub trait StyleFetcher {
    /// Retrieves the full text of the stylesheet at `identifier`.
    async fn fetch(&self, identifier: &str) -> Result<String, FetchError>;
}

/// Serves stylesheets from an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    sheets: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stylesheet, returning the fetcher for chaining.
    pub fn add(mut self, identifier: impl Into<String>, text: impl Into<String>) -> Self {
        self.sheets.insert(identifier.into(), text.into());
        self
    }

    /// Adds every `(identifier, text)` pair from `sheets`.
    pub fn add_embedded(&mut self, sheets: HashMap<String, String>) {
        self.sheets.extend(sheets);
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[async_trait(?Send)]
impl StyleFetcher for StaticFetcher {
    async fn fetch(&self, identifier: &str) -> Result<String, FetchError> {
        self.sheets
            .get(identifier)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                identifier: identifier.to_string(),
            })
    }
}

/// Reads stylesheets from the local filesystem.
///
/// Identifiers may be `file://` URLs or plain paths. Plain relative paths are
/// joined onto the fetcher's root directory when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    root: Option<PathBuf>,
}

impl FileFetcher {
    /// Creates a fetcher that resolves relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Creates a fetcher that uses identifiers as-is.
    pub fn unrooted() -> Self {
        Self { root: None }
    }

    fn path_for(&self, identifier: &str) -> Result<PathBuf, FetchError> {
        match Url::parse(identifier) {
            Ok(url) if url.scheme() == "file" => {
                url.to_file_path().map_err(|()| FetchError::NotFound {
                    identifier: identifier.to_string(),
                })
            }
            Ok(url) => Err(FetchError::UnsupportedScheme {
                identifier: identifier.to_string(),
                scheme: url.scheme().to_string(),
            }),
            Err(_) => Ok(match &self.root {
                Some(root) => root.join(identifier),
                None => PathBuf::from(identifier),
            }),
        }
    }
}

#[async_trait(?Send)]
impl StyleFetcher for FileFetcher {
    async fn fetch(&self, identifier: &str) -> Result<String, FetchError> {
        let path = self.path_for(identifier)?;
        tracing::trace!("Reading stylesheet {:?}", path);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => FetchError::NotFound {
                    identifier: identifier.to_string(),
                },
                _ => FetchError::Io {
                    identifier: identifier.to_string(),
                    source,
                },
            })
    }
}
