//! Streaming download of one product into the archive.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{DownloadError, DownloadResult};
use super::progress::ProgressTracker;
use super::relocate::relocate;
use crate::archive::ArchiveTarget;
use crate::hub::{HubClient, HubResponse, ProductRecord};
use crate::report::{Reporter, RunEvent};

/// Buffer size for reading/writing during downloads (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// A product that made it into the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedProduct {
    /// Final location of the file.
    pub path: PathBuf,
    /// Bytes actually received.
    pub bytes: u64,
    /// Size the HUB declared in `content-range`.
    pub declared_size: u64,
}

/// Filename from a `content-disposition` value.
///
/// Takes the text after the first `=`, without surrounding quotes. Anything
/// that is not a plain file name is rejected.
pub fn disposition_filename(value: &str) -> Option<String> {
    let (_, raw) = value.split_once('=')?;
    let name = raw.trim().trim_matches('"').trim();
    let is_path = name.contains(|c: char| c == '/' || c == '\\');
    if name.is_empty() || name == "." || name == ".." || is_path {
        return None;
    }
    Some(name.to_string())
}

/// Total size from a `content-range` value: the number after the `/`.
pub fn content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.split_once('/')?;
    total.trim().parse().ok()
}

/// Downloads products through a HUB client into a scratch directory and
/// moves them into the archive.
#[derive(Debug)]
pub struct ProductDownloader<'a> {
    client: &'a HubClient,
    scratch: &'a Path,
}

impl<'a> ProductDownloader<'a> {
    pub fn new(client: &'a HubClient, scratch: &'a Path) -> Self {
        Self { client, scratch }
    }

    /// Download one record and file it under `target`.
    ///
    /// Errors for which [`DownloadError::is_skip`] hold mean the HUB never
    /// handed over a complete file; nothing is left in the archive or the
    /// scratch directory in that case.
    pub fn download(
        &self,
        record: &ProductRecord,
        target: &ArchiveTarget,
        reporter: &dyn Reporter,
    ) -> DownloadResult<ArchivedProduct> {
        let url = self
            .client
            .product_url(&record.uuid)
            .map_err(DownloadError::Request)?;
        let mut response = self
            .client
            .open_product(&url)
            .map_err(DownloadError::Request)?;

        let url = url.to_string();
        let (filename, declared_size) = Self::inspect(&response, &url)?;

        reporter.report(RunEvent::DownloadStarted {
            filename: filename.clone(),
        });

        let scratch_path = self.scratch.join(&filename);
        let bytes = self
            .stream_to_file(
                &mut response,
                &url,
                &scratch_path,
                &filename,
                declared_size,
                reporter,
            )
            .map_err(|e| {
                let _ = fs::remove_file(&scratch_path);
                e
            })?;

        debug!(
            identifier = %record.identifier,
            bytes,
            declared_size,
            "Download complete"
        );

        let path = relocate(&scratch_path, &target.directory, reporter)?;
        Ok(ArchivedProduct {
            path,
            bytes,
            declared_size,
        })
    }

    /// Validate status and headers before anything is written.
    fn inspect(response: &HubResponse, url: &str) -> DownloadResult<(String, u64)> {
        if !(200..300).contains(&response.status()) {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let filename = response
            .header("content-disposition")
            .and_then(disposition_filename)
            .ok_or_else(|| DownloadError::MissingFilename {
                url: url.to_string(),
            })?;
        let declared_size = response
            .header("content-range")
            .and_then(content_range_total)
            .ok_or_else(|| DownloadError::MissingSize {
                url: url.to_string(),
            })?;

        Ok((filename, declared_size))
    }

    /// Stream the body to the scratch file.
    fn stream_to_file(
        &self,
        response: &mut HubResponse,
        url: &str,
        dest: &Path,
        filename: &str,
        declared_size: u64,
        reporter: &dyn Reporter,
    ) -> DownloadResult<u64> {
        let file = File::create(dest).map_err(|e| DownloadError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut tracker = ProgressTracker::new(declared_size);
        let body = response.body_mut();

        loop {
            let bytes_read = body.read(&mut buffer).map_err(|e| DownloadError::Stream {
                url: url.to_string(),
                source: e,
            })?;

            if bytes_read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..bytes_read])
                .map_err(|e| DownloadError::WriteFailed {
                    path: dest.to_path_buf(),
                    source: e,
                })?;

            if let Some(mark) = tracker.advance(bytes_read as u64) {
                reporter.report(RunEvent::DownloadProgress {
                    filename: filename.to_string(),
                    percent: mark.percent,
                    megabytes: mark.megabytes(),
                });
            }
        }

        writer.flush().map_err(|e| DownloadError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

        Ok(tracker.received())
    }
}
