//! Error types for product downloads.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::hub::HubError;

/// Result type for download operations.
pub type DownloadResult<T> = Result<T, DownloadError>;

/// Errors that can occur while downloading and filing one product.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The content request never got a response.
    #[error("HUB misbehaving: {0}")]
    Request(#[source] HubError),

    /// The content request was answered with an error status.
    #[error("HUB misbehaving: HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// No usable `content-disposition` filename.
    #[error("HUB misbehaving: no filename in content-disposition for {url}")]
    MissingFilename { url: String },

    /// No usable `content-range` total size.
    #[error("HUB misbehaving: no total size in content-range for {url}")]
    MissingSize { url: String },

    /// The connection broke while the body was streaming.
    #[error("HUB misbehaving: connection lost while reading {url}: {source}")]
    Stream {
        url: String,
        #[source]
        source: io::Error,
    },

    /// Writing the scratch file failed.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The archive directory could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Moving into the archive failed, also after removing a stale file.
    #[error("failed to move product into {}: {source}", path.display())]
    ArchiveIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DownloadError {
    /// Whether the HUB never handed over a complete file.
    ///
    /// Such records are skipped; local filesystem errors fail the record.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            DownloadError::Request(_)
                | DownloadError::Status { .. }
                | DownloadError::MissingFilename { .. }
                | DownloadError::MissingSize { .. }
                | DownloadError::Stream { .. }
        )
    }
}
