//! Run-scoped scratch directory.

use std::io;
use std::path::Path;

use tempfile::TempDir;

/// Suffix of scratch directory names.
pub const SCRATCH_SUFFIX: &str = "_esa_downloader";

/// A uniquely named temporary directory holding partial downloads.
///
/// The directory is removed by [`ScratchDir::close`], or on drop if the run
/// ends early.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Create a scratch directory under the system temporary directory.
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .suffix(SCRATCH_SUFFIX)
            .tempdir()?;
        Ok(Self { dir })
    }

    /// Create a scratch directory under `parent`.
    pub fn create_in(parent: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .suffix(SCRATCH_SUFFIX)
            .tempdir_in(parent)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory and anything left in it.
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }
}
