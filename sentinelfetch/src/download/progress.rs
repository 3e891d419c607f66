//! Progress thresholds for a single download.
//!
//! Progress is measured against the size the HUB declared in
//! `content-range`, not against what actually arrives. A body longer than
//! declared pushes the percentage past 100; a shorter one never reaches it.

/// Percentage step between progress marks.
pub const PROGRESS_STEP_PERCENT: u64 = 10;

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// A crossed progress threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressMark {
    /// Whole percent of the declared size received so far.
    pub percent: u64,
    /// Bytes received so far.
    pub bytes: u64,
}

impl ProgressMark {
    pub fn megabytes(&self) -> f64 {
        self.bytes as f64 / BYTES_PER_MEGABYTE
    }
}

/// Tracks received bytes and emits a mark at each 10% threshold.
///
/// The first chunk always produces the 0% mark. Once 100% has been
/// reported, no further marks are produced.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    declared_total: u64,
    received: u64,
    next_threshold: u64,
}

impl ProgressTracker {
    pub fn new(declared_total: u64) -> Self {
        Self {
            declared_total,
            received: 0,
            next_threshold: 0,
        }
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn declared_total(&self) -> u64 {
        self.declared_total
    }

    /// Account for a chunk; returns a mark when a threshold was crossed.
    ///
    /// Several thresholds crossed by one chunk produce a single mark.
    pub fn advance(&mut self, bytes: u64) -> Option<ProgressMark> {
        self.received += bytes;

        if self.declared_total == 0 || self.next_threshold > 100 {
            return None;
        }

        let percent = self.received as f64 / self.declared_total as f64 * 100.0;
        if percent < self.next_threshold as f64 {
            return None;
        }

        let whole = percent as u64;
        let reached = (whole / PROGRESS_STEP_PERCENT) * PROGRESS_STEP_PERCENT;
        self.next_threshold = reached.min(100) + PROGRESS_STEP_PERCENT;

        Some(ProgressMark {
            percent: whole,
            bytes: self.received,
        })
    }
}
