//! Run reporting.
//!
//! Components never log through global state directly. They emit
//! [`RunEvent`]s into a [`Reporter`] handed to them by the caller:
//!
//! - [`TracingReporter`] forwards events to `tracing` (the log file in the CLI)
//! - [`MemoryReporter`] keeps events in memory so tests can inspect them

use std::fmt;
use std::path::PathBuf;

use parking_lot::Mutex;

/// How serious an event is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Something worth telling the user about during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// The search request is about to be sent.
    QueryIssued { hub: String, query: String },
    /// The HUB answered the search request.
    QueryResponse { hub: String, status: u16 },
    /// The search produced nothing usable.
    QueryFailed { hub: String, reason: String },
    /// Entries parsed from the search feed.
    QueryResults { count: usize },
    /// The result set hit the row limit.
    QueryTooLarge { count: usize, max_rows: usize },
    /// Sequential download of the records begins.
    DownloadsStarted { count: usize },
    /// A record was not downloaded.
    RecordSkipped { identifier: String, reason: String },
    /// A product file started streaming into the scratch directory.
    DownloadStarted { filename: String },
    /// A 10% threshold of the declared size was crossed.
    DownloadProgress {
        filename: String,
        percent: u64,
        megabytes: f64,
    },
    /// A product landed in the archive.
    RecordArchived {
        identifier: String,
        path: PathBuf,
        bytes: u64,
    },
    /// An archive file of the same name was in the way and got replaced.
    StaleFileReplaced { path: PathBuf, reason: String },
    /// A record failed after it was downloaded.
    RecordFailed { identifier: String, reason: String },
    /// The scratch directory could not be removed.
    ScratchCleanupFailed { path: PathBuf, reason: String },
    /// End of the run.
    Finished {
        archived: usize,
        skipped: usize,
        failed: usize,
    },
}

impl RunEvent {
    pub fn severity(&self) -> Severity {
        match self {
            RunEvent::QueryFailed { .. }
            | RunEvent::QueryTooLarge { .. }
            | RunEvent::RecordFailed { .. } => Severity::Error,
            RunEvent::RecordSkipped { .. }
            | RunEvent::StaleFileReplaced { .. }
            | RunEvent::ScratchCleanupFailed { .. } => Severity::Warning,
            _ => Severity::Info,
        }
    }

    /// Short machine-friendly name of the event.
    pub fn kind(&self) -> &'static str {
        match self {
            RunEvent::QueryIssued { .. } => "query_issued",
            RunEvent::QueryResponse { .. } => "query_response",
            RunEvent::QueryFailed { .. } => "query_failed",
            RunEvent::QueryResults { .. } => "query_results",
            RunEvent::QueryTooLarge { .. } => "query_too_large",
            RunEvent::DownloadsStarted { .. } => "downloads_started",
            RunEvent::RecordSkipped { .. } => "record_skipped",
            RunEvent::DownloadStarted { .. } => "download_started",
            RunEvent::DownloadProgress { .. } => "download_progress",
            RunEvent::RecordArchived { .. } => "record_archived",
            RunEvent::StaleFileReplaced { .. } => "stale_file_replaced",
            RunEvent::RecordFailed { .. } => "record_failed",
            RunEvent::ScratchCleanupFailed { .. } => "scratch_cleanup_failed",
            RunEvent::Finished { .. } => "finished",
        }
    }
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunEvent::QueryIssued { hub, query } => {
                write!(f, "Querying data at: {} Query: {}", hub, query)
            }
            RunEvent::QueryResponse { hub, status } => write!(f, "Code {}: {}", hub, status),
            RunEvent::QueryFailed { hub, reason } => {
                write!(f, "Data query to {} was not successful: {}", hub, reason)
            }
            RunEvent::QueryResults { count } => write!(f, "Found {} products", count),
            RunEvent::QueryTooLarge { count, max_rows } => write!(
                f,
                "The number of scenes ({}) reached the maximum ({}): increase max_rows!",
                count, max_rows
            ),
            RunEvent::DownloadsStarted { count } => {
                write!(f, "Started downloading {} files ...", count)
            }
            RunEvent::RecordSkipped { identifier, reason } => {
                write!(f, "Skipping {}: {}", identifier, reason)
            }
            RunEvent::DownloadStarted { filename } => write!(f, "Downloading {} ...", filename),
            RunEvent::DownloadProgress {
                filename,
                percent,
                megabytes,
            } => write!(
                f,
                "{}: {}% complete, {:.3} Mb downloaded",
                filename, percent, megabytes
            ),
            RunEvent::RecordArchived {
                identifier,
                path,
                bytes,
            } => write!(
                f,
                "Archived {} to {} ({} bytes)",
                identifier,
                path.display(),
                bytes
            ),
            RunEvent::StaleFileReplaced { path, reason } => {
                write!(f, "Replacing stale file {}: {}", path.display(), reason)
            }
            RunEvent::RecordFailed { identifier, reason } => {
                write!(f, "Failed to archive {}: {}", identifier, reason)
            }
            RunEvent::ScratchCleanupFailed { path, reason } => write!(
                f,
                "Could not remove scratch directory {}: {}",
                path.display(),
                reason
            ),
            RunEvent::Finished {
                archived,
                skipped,
                failed,
            } => write!(
                f,
                "Finished downloading! ({} archived, {} skipped, {} failed)",
                archived, skipped, failed
            ),
        }
    }
}

/// Sink for run events.
pub trait Reporter: Send + Sync {
    fn report(&self, event: RunEvent);
}

/// Forwards events to `tracing` at a level matching their severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: RunEvent) {
        match event.severity() {
            Severity::Info => tracing::info!(kind = event.kind(), "{}", event),
            Severity::Warning => tracing::warn!(kind = event.kind(), "{}", event),
            Severity::Error => tracing::error!(kind = event.kind(), "{}", event),
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<RunEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event reported so far.
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().clone()
    }

    /// Events of exactly the given severity.
    pub fn with_severity(&self, severity: Severity) -> Vec<RunEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.severity() == severity)
            .cloned()
            .collect()
    }

    pub fn warnings(&self) -> Vec<RunEvent> {
        self.with_severity(Severity::Warning)
    }

    pub fn errors(&self) -> Vec<RunEvent> {
        self.with_severity(Severity::Error)
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, event: RunEvent) {
        self.events.lock().push(event);
    }
}
