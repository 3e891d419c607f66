//! Error types for the configuration file.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading, editing or writing the
/// configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but could not be read or parsed.
    #[error("failed to read config file {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    /// The file or its directory could not be written.
    #[error("failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A value does not have the expected type.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// No such `section.key`.
    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),
}

impl ConfigFileError {
    pub(crate) fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        ConfigFileError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
