//! Mapping of product records to archive directories.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::error::ResolveError;
use super::mission::MissionRules;
use crate::hub::ProductRecord;

/// Where one record belongs in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveTarget {
    /// Directory the product file is moved into.
    pub directory: PathBuf,
    /// Mission code the identifier was recognised as.
    pub mission: String,
    /// Acquisition time read from the identifier.
    pub acquired: NaiveDateTime,
}

/// Resolves records to archive directories.
///
/// Resolution is pure: it only looks at the identifier and never touches the
/// filesystem.
#[derive(Debug)]
pub struct ArchiveResolver {
    root: PathBuf,
    partition_by_date: bool,
    rules: MissionRules,
}

impl ArchiveResolver {
    /// Create a resolver with the Sentinel mission rules.
    pub fn new(root: impl Into<PathBuf>, partition_by_date: bool) -> Self {
        Self {
            root: root.into(),
            partition_by_date,
            rules: MissionRules::sentinel(),
        }
    }

    /// Replace the mission rule table.
    pub fn with_rules(mut self, rules: MissionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn partition_by_date(&self) -> bool {
        self.partition_by_date
    }

    /// Work out the archive directory of a record.
    pub fn resolve(&self, record: &ProductRecord) -> Result<ArchiveTarget, ResolveError> {
        let (mission, acquired) = self.rules.acquisition_time(&record.identifier)?;
        Ok(ArchiveTarget {
            directory: self.directory_for(&acquired),
            mission,
            acquired,
        })
    }

    /// Archive directory for an acquisition time: `root` or `root/YYYY/MM/DD`.
    pub fn directory_for(&self, acquired: &NaiveDateTime) -> PathBuf {
        if self.partition_by_date {
            self.root
                .join(acquired.format("%Y").to_string())
                .join(acquired.format("%m").to_string())
                .join(acquired.format("%d").to_string())
        } else {
            self.root.clone()
        }
    }
}
