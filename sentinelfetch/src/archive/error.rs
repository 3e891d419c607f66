//! Errors raised while resolving a record to its archive location.

use thiserror::Error;

/// Reasons a record cannot be placed in the archive.
///
/// These only ever skip the record concerned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The identifier does not start with a known mission code.
    #[error("not a Sentinel file name: {identifier}")]
    UnrecognizedMission { identifier: String },

    /// No acquisition time could be read from the identifier.
    #[error("no acquisition time in {identifier} for mission {mission}")]
    UnparseableTimestamp {
        identifier: String,
        mission: String,
    },
}
