//! CLI error type.

use sentinelfetch::config::ConfigFileError;
use sentinelfetch::hub::HubError;
use sentinelfetch::logging::LoggingError;
use sentinelfetch::query::ConfigurationError;
use sentinelfetch::run::RunError;

/// Errors that end a CLI command.
#[derive(Debug)]
pub enum CliError {
    /// Bad command-line or config file usage.
    Config(String),
    /// The search could not be set up.
    Configuration(ConfigurationError),
    /// The configuration file could not be read or written.
    ConfigFile(ConfigFileError),
    /// The log file could not be set up.
    Logging(LoggingError),
    /// The HTTP client could not be created.
    Hub(HubError),
    /// The run was aborted.
    Run(RunError),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Configuration(_) | CliError::ConfigFile(_) => 2,
            CliError::Logging(_) | CliError::Hub(_) | CliError::Run(_) => 1,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "{}", msg),
            CliError::Configuration(e) => write!(f, "configuration error: {}", e),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Hub(e) => write!(f, "{}", e),
            CliError::Run(e) => write!(f, "run aborted: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::Configuration(e) => Some(e),
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Hub(e) => Some(e),
            CliError::Run(e) => Some(e),
        }
    }
}

impl From<ConfigurationError> for CliError {
    fn from(e: ConfigurationError) -> Self {
        CliError::Configuration(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<HubError> for CliError {
    fn from(e: HubError) -> Self {
        CliError::Hub(e)
    }
}

impl From<RunError> for CliError {
    fn from(e: RunError) -> Self {
        CliError::Run(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_exit_with_usage_code() {
        let err: CliError = ConfigurationError::MissingFootprint.into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("configuration error"));
    }

    #[test]
    fn test_run_errors_exit_with_failure_code() {
        let err: CliError = RunError::QueryTooLarge {
            count: 99,
            max_rows: 99,
        }
        .into();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("increase max_rows"));
    }
}
