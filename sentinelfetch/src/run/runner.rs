//! The archive run: search once, then download every record in feed order.

use std::path::PathBuf;

use tracing::{debug, info};

use super::error::{RunError, RunResult};
use super::outcome::{RecordOutcome, RunSummary};
use crate::archive::ArchiveResolver;
use crate::download::{ProductDownloader, ScratchDir};
use crate::hub::{HubClient, HubTransport, ProductRecord};
use crate::query::QueryParameters;
use crate::report::{Reporter, RunEvent};

/// One run against one HUB.
///
/// The transport, and with it the HTTP session, is shared by the search and
/// every download.
#[derive(Debug)]
pub struct ArchiveRun {
    client: HubClient,
    params: QueryParameters,
    resolver: ArchiveResolver,
    scratch_parent: Option<PathBuf>,
}

impl ArchiveRun {
    pub fn new(
        transport: Box<dyn HubTransport>,
        params: QueryParameters,
        resolver: ArchiveResolver,
    ) -> Self {
        let client = HubClient::new(transport, params.hub().clone());
        Self {
            client,
            params,
            resolver,
            scratch_parent: None,
        }
    }

    /// Create the scratch directory under `parent` instead of the system
    /// temporary directory.
    pub fn with_scratch_parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.scratch_parent = Some(parent.into());
        self
    }

    pub fn params(&self) -> &QueryParameters {
        &self.params
    }

    /// Execute the run.
    ///
    /// Fails only when the search hits the row limit or the scratch
    /// directory cannot be created. Everything else is reported and
    /// recorded in the returned summary.
    pub fn execute(&self, reporter: &dyn Reporter) -> RunResult<RunSummary> {
        let records = self.client.search(&self.params, reporter)?;

        let scratch = match &self.scratch_parent {
            Some(parent) => ScratchDir::create_in(parent),
            None => ScratchDir::create(),
        }
        .map_err(RunError::Scratch)?;
        debug!(path = %scratch.path().display(), "Created scratch directory");

        reporter.report(RunEvent::DownloadsStarted {
            count: records.len(),
        });

        let downloader = ProductDownloader::new(&self.client, scratch.path());
        let mut summary = RunSummary::new();
        for record in &records {
            let outcome = self.process(record, &downloader, reporter);
            reporter.report(outcome.event());
            summary.record(outcome);
        }

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            reporter.report(RunEvent::ScratchCleanupFailed {
                path: scratch_path,
                reason: e.to_string(),
            });
        }

        info!(
            archived = summary.archived(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            "Run complete"
        );
        reporter.report(summary.finished_event());
        Ok(summary)
    }

    /// Resolve and download one record.
    fn process(
        &self,
        record: &ProductRecord,
        downloader: &ProductDownloader<'_>,
        reporter: &dyn Reporter,
    ) -> RecordOutcome {
        let identifier = record.identifier.clone();

        let target = match self.resolver.resolve(record) {
            Ok(target) => target,
            Err(e) => {
                return RecordOutcome::Skipped {
                    identifier,
                    reason: e.to_string(),
                }
            }
        };

        match downloader.download(record, &target, reporter) {
            Ok(product) => RecordOutcome::Archived {
                identifier,
                path: product.path,
                bytes: product.bytes,
            },
            Err(e) if e.is_skip() => RecordOutcome::Skipped {
                identifier,
                reason: e.to_string(),
            },
            Err(error) => RecordOutcome::Failed { identifier, error },
        }
    }
}
