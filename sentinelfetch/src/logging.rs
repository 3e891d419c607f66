//! Per-run log file.
//!
//! Every run writes to a fresh `<prefix>_YYYYMMDD_HHMMSS.log` in the working
//! directory (or wherever the prefix points). Lines carry local timestamps.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::EnvFilter;

/// Default log file prefix.
pub const DEFAULT_LOG_PREFIX: &str = "Download_log";

/// Log level used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors setting up the log file.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log file {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Keeps the background log writer alive; dropping it flushes the file.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _guard: WorkerGuard,
    path: PathBuf,
}

impl LogGuard {
    /// The log file of this run.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for LogGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogGuard").field("path", &self.path).finish()
    }
}

/// `<prefix>_YYYYMMDD_HHMMSS.log`
pub fn log_file_name(prefix: &str, at: &DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("{}_{}.log", prefix, at.format("%Y%m%d_%H%M%S")))
}

/// Create the log file, replacing an existing file of the same name.
pub fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    let create_err = |source| LoggingError::Create {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(create_err)?;
    }
    if path.exists() {
        fs::remove_file(path).map_err(create_err)?;
    }
    File::create(path).map_err(create_err)
}

/// Install the global subscriber writing to a new per-run log file.
///
/// The returned guard must be held until the run ends.
pub fn init_file_logging(prefix: &str) -> Result<LogGuard, LoggingError> {
    let path = log_file_name(prefix, &Local::now());
    let file = open_log_file(&path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let timer = OffsetTime::local_rfc_3339()
        .unwrap_or_else(|_| OffsetTime::new(UtcOffset::UTC, Rfc3339));
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(LogGuard {
        _guard: guard,
        path,
    })
}
