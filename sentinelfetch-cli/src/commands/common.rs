//! Common utilities shared across CLI commands.

use std::path::Path;

use sentinelfetch::config::ConfigFile;

use crate::error::CliError;

/// Load the configuration file, from `path` when given.
///
/// A missing file yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}

/// CLI value if given and non-empty, else the config value.
pub fn resolve_optional(cli: Option<String>, config: &Option<String>) -> Option<String> {
    // CLI takes precedence, then config
    cli.filter(|v| !v.trim().is_empty())
        .or_else(|| config.clone())
}

/// Message for an unrecognised `section.key`.
pub fn unknown_key(key: &str) -> CliError {
    CliError::Config(format!(
        "Unknown configuration key '{}'. Use 'sentinelfetch config list' to see available keys.",
        key
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolve_optional_prefers_cli() {
        let config = Some("from-config".to_string());
        assert_eq!(
            resolve_optional(Some("from-cli".to_string()), &config).as_deref(),
            Some("from-cli")
        );
        assert_eq!(
            resolve_optional(None, &config).as_deref(),
            Some("from-config")
        );
        assert_eq!(
            resolve_optional(Some("  ".to_string()), &config).as_deref(),
            Some("from-config")
        );
        assert_eq!(resolve_optional(None, &None), None);
    }

    #[test]
    fn test_load_config_from_explicit_path() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("custom.ini");
        fs::write(&path, "[hub]\nusername = alice\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.hub.username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_load_config_reports_bad_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("custom.ini");
        fs::write(&path, "[hub]\nmax_rows = lots\n").unwrap();

        assert!(matches!(
            load_config(Some(&path)),
            Err(CliError::ConfigFile(_))
        ));
    }
}
