//! Run driver.
//!
//! Ties the pipeline together: build query, fetch metadata once, resolve and
//! download each record in feed order, clean up, report the summary.

mod error;
mod outcome;
mod runner;

pub use error::{RunError, RunResult};
pub use outcome::{RecordOutcome, RunSummary};
pub use runner::ArchiveRun;
