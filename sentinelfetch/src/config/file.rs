//! The INI configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;

use super::error::ConfigFileError;
use super::keys::ConfigKey;
use crate::hub::{DEFAULT_HUB_URL, DEFAULT_RETRIES};
use crate::logging::DEFAULT_LOG_PREFIX;
use crate::query::DEFAULT_MAX_ROWS;

/// Location of the configuration file:
/// `<config dir>/sentinelfetch/config.ini`.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sentinelfetch")
        .join("config.ini")
}

/// `[hub]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubSection {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub max_rows: usize,
    pub retries: u32,
    /// Search request timeout; unset means no timeout.
    pub timeout_secs: Option<u64>,
}

impl Default for HubSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_HUB_URL.to_string(),
            username: None,
            password: None,
            max_rows: DEFAULT_MAX_ROWS,
            retries: DEFAULT_RETRIES,
            timeout_secs: None,
        }
    }
}

/// `[archive]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSection {
    pub root_dir: PathBuf,
    /// Partition the archive into `YYYY/MM/DD` directories.
    pub make_subdir: bool,
}

impl Default for ArchiveSection {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./"),
            make_subdir: false,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSection {
    pub file_prefix: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            file_prefix: DEFAULT_LOG_PREFIX.to_string(),
        }
    }
}

/// Contents of the configuration file.
///
/// Missing keys take their defaults; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub hub: HubSection,
    pub archive: ArchiveSection,
    pub logging: LoggingSection,
}

impl ConfigFile {
    /// Load from the default location; a missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigFileError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Build from parsed INI data.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigFileError> {
        let mut config = Self::default();
        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|props| props.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Render as INI data. Unset optional values are left out.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }
        ini
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        let write_err = |source| ConfigFileError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        self.to_ini().write_to_file(path).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.hub.url, "https://coda.eumetsat.int");
        assert_eq!(config.hub.max_rows, 99);
        assert_eq!(config.hub.retries, 1);
        assert_eq!(config.hub.timeout_secs, None);
        assert_eq!(config.archive.root_dir, PathBuf::from("./"));
        assert!(!config.archive.make_subdir);
        assert_eq!(config.logging.file_prefix, "Download_log");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        fs::write(
            &path,
            "[hub]\nusername = alice\nmax_rows = 250\n\n[archive]\nmake_subdir = yes\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.hub.username.as_deref(), Some("alice"));
        assert_eq!(config.hub.max_rows, 250);
        assert!(config.archive.make_subdir);
        assert_eq!(config.hub.url, DEFAULT_HUB_URL);
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        fs::write(&path, "[hub]\nretries = many\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::InvalidValue { ref key, .. } if key == "hub.retries"
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.hub.username = Some("alice".to_string());
        config.hub.timeout_secs = Some(30);
        config.archive.root_dir = PathBuf::from("/data/sentinel");
        config.save_to(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("[hub]"));
        assert!(!text.contains("password"));

        assert_eq!(ConfigFile::load_from(&path).unwrap(), config);
    }
}
