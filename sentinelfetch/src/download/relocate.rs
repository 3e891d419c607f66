//! Moving finished downloads into the archive.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{DownloadError, DownloadResult};
use crate::report::{Reporter, RunEvent};

/// Move a file into `directory`, creating the directory first.
///
/// A file already present under the same name is treated as stale: it is
/// removed and the move is attempted once more. Returns the final path.
pub fn relocate(
    source: &Path,
    directory: &Path,
    reporter: &dyn Reporter,
) -> DownloadResult<PathBuf> {
    fs::create_dir_all(directory).map_err(|e| DownloadError::CreateDirFailed {
        path: directory.to_path_buf(),
        source: e,
    })?;

    let file_name = source.file_name().ok_or_else(|| DownloadError::ArchiveIo {
        path: directory.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
    })?;
    let dest = directory.join(file_name);

    if let Err(first) = move_file(source, &dest) {
        debug!(path = %dest.display(), error = %first, "Move into archive failed, retrying");
        if dest.exists() {
            reporter.report(RunEvent::StaleFileReplaced {
                path: dest.clone(),
                reason: first.to_string(),
            });
            fs::remove_file(&dest).map_err(|e| DownloadError::ArchiveIo {
                path: dest.clone(),
                source: e,
            })?;
        }
        move_file(source, &dest).map_err(|e| DownloadError::ArchiveIo {
            path: dest.clone(),
            source: e,
        })?;
    }

    Ok(dest)
}

/// Move without overwriting.
///
/// Falls back to copy and remove when a rename is not possible, e.g. across
/// filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if to.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination already exists",
        ));
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!(from = %from.display(), to = %to.display(), error = %e, "Rename failed, copying");
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}
