//! Per-record results of a run.

use std::path::PathBuf;

use crate::download::DownloadError;
use crate::report::RunEvent;

/// What happened to one record.
#[derive(Debug)]
pub enum RecordOutcome {
    /// The product is in the archive.
    Archived {
        identifier: String,
        path: PathBuf,
        bytes: u64,
    },
    /// The record was passed over: unknown mission, unreadable identifier
    /// or a HUB that would not hand over the file.
    Skipped { identifier: String, reason: String },
    /// The product was downloaded but could not be filed.
    Failed {
        identifier: String,
        error: DownloadError,
    },
}

impl RecordOutcome {
    pub fn identifier(&self) -> &str {
        match self {
            RecordOutcome::Archived { identifier, .. }
            | RecordOutcome::Skipped { identifier, .. }
            | RecordOutcome::Failed { identifier, .. } => identifier,
        }
    }

    /// The event announcing this outcome.
    pub fn event(&self) -> RunEvent {
        match self {
            RecordOutcome::Archived {
                identifier,
                path,
                bytes,
            } => RunEvent::RecordArchived {
                identifier: identifier.clone(),
                path: path.clone(),
                bytes: *bytes,
            },
            RecordOutcome::Skipped { identifier, reason } => RunEvent::RecordSkipped {
                identifier: identifier.clone(),
                reason: reason.clone(),
            },
            RecordOutcome::Failed { identifier, error } => RunEvent::RecordFailed {
                identifier: identifier.clone(),
                reason: error.to_string(),
            },
        }
    }
}

/// Outcomes of a run, in feed order.
#[derive(Debug, Default)]
pub struct RunSummary {
    outcomes: Vec<RecordOutcome>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: RecordOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[RecordOutcome] {
        &self.outcomes
    }

    pub fn archived(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Archived { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Failed { .. }))
    }

    /// Paths of all archived products.
    pub fn archived_paths(&self) -> Vec<&PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                RecordOutcome::Archived { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    /// The closing event of the run.
    pub fn finished_event(&self) -> RunEvent {
        RunEvent::Finished {
            archived: self.archived(),
            skipped: self.skipped(),
            failed: self.failed(),
        }
    }

    fn count(&self, predicate: impl Fn(&RecordOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(o)).count()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    fn failed() -> RecordOutcome {
        RecordOutcome::Failed {
            identifier: "S3A_c".to_string(),
            error: DownloadError::ArchiveIo {
                path: PathBuf::from("/archive/c.zip"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            },
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::new();
        summary.record(RecordOutcome::Archived {
            identifier: "S3A_a".to_string(),
            path: PathBuf::from("/archive/a.zip"),
            bytes: 10,
        });
        summary.record(RecordOutcome::Skipped {
            identifier: "LC08_b".to_string(),
            reason: "unrecognized mission".to_string(),
        });
        summary.record(failed());

        assert_eq!(summary.archived(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.archived_paths(), vec![&PathBuf::from("/archive/a.zip")]);
        assert_eq!(
            summary.finished_event(),
            RunEvent::Finished {
                archived: 1,
                skipped: 1,
                failed: 1
            }
        );
    }

    #[test]
    fn test_failed_outcome_event_carries_reason() {
        let outcome = failed();
        assert_eq!(outcome.identifier(), "S3A_c");
        match outcome.event() {
            RunEvent::RecordFailed { reason, .. } => assert!(reason.contains("/archive/c.zip")),
            other => panic!("unexpected event {:?}", other),
        }
    }
}
