//! Product download.
//!
//! Streams one product at a time into a run-scoped scratch directory, then
//! moves the finished file into its archive directory.

mod error;
mod product;
mod progress;
mod relocate;
mod scratch;

pub use error::{DownloadError, DownloadResult};
pub use product::{content_range_total, disposition_filename, ArchivedProduct, ProductDownloader};
pub use progress::{ProgressMark, ProgressTracker, PROGRESS_STEP_PERCENT};
pub use relocate::relocate;
pub use scratch::{ScratchDir, SCRATCH_SUFFIX};
