//! Errors that abort a whole run.

use std::io;

use thiserror::Error;

use crate::hub::HubError;

/// Result type for run operations.
pub type RunResult<T> = Result<T, RunError>;

/// Conditions that stop a run before its downloads.
///
/// Per-record problems never show up here; they end up in the
/// [`RunSummary`](super::RunSummary).
#[derive(Debug, Error)]
pub enum RunError {
    /// The search hit the row limit, so its results may be incomplete.
    #[error(
        "the number of scenes ({count}) reached the maximum ({max_rows}): increase max_rows!"
    )]
    QueryTooLarge { count: usize, max_rows: usize },

    /// Any other fatal HUB error.
    #[error("HUB error: {0}")]
    Hub(#[source] HubError),

    /// The scratch directory could not be created.
    #[error("failed to create scratch directory: {0}")]
    Scratch(#[source] io::Error),
}

impl From<HubError> for RunError {
    fn from(err: HubError) -> Self {
        match err {
            HubError::QueryTooLarge { count, max_rows } => {
                RunError::QueryTooLarge { count, max_rows }
            }
            other => RunError::Hub(other),
        }
    }
}
