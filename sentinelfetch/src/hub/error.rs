//! Error types for HUB communication.

use thiserror::Error;

/// Result type for HUB operations.
pub type HubResult<T> = Result<T, HubError>;

/// Errors that can occur while talking to the HUB.
#[derive(Debug, Error)]
pub enum HubError {
    /// The HTTP client could not be created.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),

    /// The request never produced a response.
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The HUB answered with an unexpected status code.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The search feed could not be understood.
    #[error("malformed search feed: {0}")]
    MalformedFeed(String),

    /// The result set reached the row limit and may be truncated.
    #[error(
        "the number of scenes ({count}) reached the maximum ({max_rows}): increase max_rows!"
    )]
    QueryTooLarge { count: usize, max_rows: usize },

    /// A URL could not be built from the HUB settings.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl HubError {
    /// Whether this error must abort the run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, HubError::QueryTooLarge { .. })
    }
}
