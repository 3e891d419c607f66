//! Configuration file support.
//!
//! Settings live in an INI file at `<config dir>/sentinelfetch/config.ini`.
//! Command-line values take precedence over the file, and the file over the
//! built-in defaults.

mod error;
mod file;
mod keys;

pub use error::ConfigFileError;
pub use file::{config_file_path, ArchiveSection, ConfigFile, HubSection, LoggingSection};
pub use keys::ConfigKey;
