//! Error types for the search gateway.

use thiserror::Error;

/// Errors that can occur when querying the search service.
///
/// None of these affect playback; the previous result set is kept and the
/// caller may resubmit the query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Search endpoint configuration is unusable
    #[error("Invalid search endpoint: {0}")]
    InvalidEndpoint(String),

    /// Network failure or timeout
    #[error("Search for {query:?} failed: {message}")]
    Request { query: String, message: String },

    /// Service returned a non-success status
    #[error("Search for {query:?} returned HTTP {status}: {message}")]
    Server {
        query: String,
        status: u16,
        message: String,
    },

    /// Response body was not a list of track descriptors
    #[error("Search for {query:?} returned an unreadable response: {message}")]
    Parse { query: String, message: String },
}

impl SearchError {
    /// Query the failed request was issued for
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::InvalidEndpoint(_) => None,
            Self::Request { query, .. } | Self::Server { query, .. } | Self::Parse { query, .. } => {
                Some(query)
            }
        }
    }
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
