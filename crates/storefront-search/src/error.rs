//! Search error types.

use thiserror::Error;

/// Errors raised at the search collaborator seam.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The index service rejected the request or was unreachable.
    #[error("Search backend failed: {0}")]
    Upstream(String),

    /// The index service answered with something we could not read.
    #[error("Malformed search response: {0}")]
    MalformedResponse(String),

    /// Missing or invalid client configuration.
    #[error("Search configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SearchError {
    fn from(e: serde_json::Error) -> Self {
        SearchError::MalformedResponse(e.to_string())
    }
}
