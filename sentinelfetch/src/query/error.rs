//! Pre-flight configuration errors.

use thiserror::Error;

/// Errors detected while assembling a search query.
///
/// All of these are fatal and are reported before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No footprint was supplied.
    #[error("no footprint selected, use the --fprint option")]
    MissingFootprint,

    /// Footprint text is not `lat1,lon1:lat2,lon2`.
    #[error("invalid footprint '{text}': {reason}")]
    InvalidFootprint { text: String, reason: String },

    /// A date token could not be interpreted.
    #[error("incorrect date '{token}': {reason}")]
    InvalidDate { token: String, reason: String },

    /// A required credential is empty or absent.
    #[error("no {0} provided")]
    MissingCredential(&'static str),

    /// The HUB base URL cannot be parsed.
    #[error("invalid HUB URL '{url}': {reason}")]
    InvalidHubUrl { url: String, reason: String },

    /// The row limit must allow at least one record.
    #[error("row limit must be at least 1")]
    InvalidRowLimit,
}
