//! Style loading and resolution errors.

use thiserror::Error;

/// Error returned by a [`StyleFetcher`](crate::StyleFetcher) when a stylesheet
/// cannot be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The fetcher has no stylesheet under this identifier.
    #[error("stylesheet '{identifier}' not found")]
    NotFound { identifier: String },

    /// Reading the stylesheet failed.
    #[error("failed to read stylesheet '{identifier}': {source}")]
    Io {
        identifier: String,
        #[source]
        source: std::io::Error,
    },

    /// The identifier uses a scheme the fetcher cannot serve.
    #[error("cannot fetch '{identifier}': unsupported scheme '{scheme}'")]
    UnsupportedScheme { identifier: String, scheme: String },
}

/// Error type for stylesheet caching and resource resolution.
#[derive(Debug, Error)]
pub enum StyleError {
    /// The fetch capability rejected. The entry has been reset to
    /// [`LoadState::Unloaded`](crate::LoadState::Unloaded).
    #[error("failed to load stylesheet '{identifier}'")]
    Fetch {
        identifier: String,
        #[source]
        source: FetchError,
    },

    /// The resolver has no rule for this resource type.
    #[error("unknown resource type '{kind}'")]
    UnknownResourceType { kind: String },

    /// A resource name that would escape its resource directory.
    #[error("invalid resource name '{name}'")]
    InvalidResourceName { name: String },

    /// A base URL or resolved URL failed to parse.
    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Resolver configuration could not be parsed.
    #[error("invalid resolver configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl StyleError {
    /// Returns the identifier of the failed load, if this is a fetch failure.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            StyleError::Fetch { identifier, .. } => Some(identifier.as_str()),
            _ => None,
        }
    }
}
