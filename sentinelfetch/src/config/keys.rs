//! Addressable configuration keys for `config get/set/list`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::error::ConfigFileError;
use super::file::ConfigFile;

/// A `section.key` of the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    HubUrl,
    HubUsername,
    HubPassword,
    HubMaxRows,
    HubRetries,
    HubTimeoutSecs,
    ArchiveRootDir,
    ArchiveMakeSubdir,
    LoggingFilePrefix,
}

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::HubUrl,
            ConfigKey::HubUsername,
            ConfigKey::HubPassword,
            ConfigKey::HubMaxRows,
            ConfigKey::HubRetries,
            ConfigKey::HubTimeoutSecs,
            ConfigKey::ArchiveRootDir,
            ConfigKey::ArchiveMakeSubdir,
            ConfigKey::LoggingFilePrefix,
        ]
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::HubUrl
            | ConfigKey::HubUsername
            | ConfigKey::HubPassword
            | ConfigKey::HubMaxRows
            | ConfigKey::HubRetries
            | ConfigKey::HubTimeoutSecs => "hub",
            ConfigKey::ArchiveRootDir | ConfigKey::ArchiveMakeSubdir => "archive",
            ConfigKey::LoggingFilePrefix => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::HubUrl => "url",
            ConfigKey::HubUsername => "username",
            ConfigKey::HubPassword => "password",
            ConfigKey::HubMaxRows => "max_rows",
            ConfigKey::HubRetries => "retries",
            ConfigKey::HubTimeoutSecs => "timeout_secs",
            ConfigKey::ArchiveRootDir => "root_dir",
            ConfigKey::ArchiveMakeSubdir => "make_subdir",
            ConfigKey::LoggingFilePrefix => "file_prefix",
        }
    }

    /// Full name, e.g. `hub.max_rows`.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Values that should not be echoed in listings.
    pub fn is_secret(&self) -> bool {
        matches!(self, ConfigKey::HubPassword)
    }

    /// Current value as text; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::HubUrl => config.hub.url.clone(),
            ConfigKey::HubUsername => config.hub.username.clone().unwrap_or_default(),
            ConfigKey::HubPassword => config.hub.password.clone().unwrap_or_default(),
            ConfigKey::HubMaxRows => config.hub.max_rows.to_string(),
            ConfigKey::HubRetries => config.hub.retries.to_string(),
            ConfigKey::HubTimeoutSecs => config
                .hub
                .timeout_secs
                .map(|t| t.to_string())
                .unwrap_or_default(),
            ConfigKey::ArchiveRootDir => config.archive.root_dir.display().to_string(),
            ConfigKey::ArchiveMakeSubdir => config.archive.make_subdir.to_string(),
            ConfigKey::LoggingFilePrefix => config.logging.file_prefix.clone(),
        }
    }

    /// Parse and store a value. Empty text clears optional values.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigFileError> {
        let value = value.trim();
        let name = self.name();

        match self {
            ConfigKey::HubUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(ConfigFileError::invalid(
                        &name,
                        value,
                        "expected an http:// or https:// URL",
                    ));
                }
                config.hub.url = value.to_string();
            }
            ConfigKey::HubUsername => config.hub.username = optional(value),
            ConfigKey::HubPassword => config.hub.password = optional(value),
            ConfigKey::HubMaxRows => {
                let rows: usize = value
                    .parse()
                    .map_err(|_| ConfigFileError::invalid(&name, value, "expected a number"))?;
                if rows == 0 {
                    return Err(ConfigFileError::invalid(&name, value, "must be at least 1"));
                }
                config.hub.max_rows = rows;
            }
            ConfigKey::HubRetries => {
                config.hub.retries = value
                    .parse()
                    .map_err(|_| ConfigFileError::invalid(&name, value, "expected a number"))?;
            }
            ConfigKey::HubTimeoutSecs => {
                config.hub.timeout_secs = match optional(value) {
                    None => None,
                    Some(text) => match text.parse::<u64>() {
                        Ok(secs) if secs > 0 => Some(secs),
                        _ => {
                            return Err(ConfigFileError::invalid(
                                &name,
                                value,
                                "expected a positive number of seconds",
                            ))
                        }
                    },
                };
            }
            ConfigKey::ArchiveRootDir => {
                if value.is_empty() {
                    return Err(ConfigFileError::invalid(&name, value, "must not be empty"));
                }
                config.archive.root_dir = PathBuf::from(value);
            }
            ConfigKey::ArchiveMakeSubdir => {
                config.archive.make_subdir = parse_bool(value)
                    .ok_or_else(|| ConfigFileError::invalid(&name, value, "expected true or false"))?;
            }
            ConfigKey::LoggingFilePrefix => {
                if value.is_empty() {
                    return Err(ConfigFileError::invalid(&name, value, "must not be empty"));
                }
                config.logging.file_prefix = value.to_string();
            }
        }

        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigFileError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
