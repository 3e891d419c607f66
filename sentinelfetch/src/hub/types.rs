//! HUB connection settings and product records.

use std::fmt;
use std::time::Duration;

use reqwest::Url;

use crate::query::ConfigurationError;

/// Default HUB base URL.
pub const DEFAULT_HUB_URL: &str = "https://coda.eumetsat.int";

/// Default number of connection retries for the search request.
pub const DEFAULT_RETRIES: u32 = 1;

/// Basic-auth credentials for the HUB.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where and how to talk to the HUB.
#[derive(Debug, Clone)]
pub struct HubSettings {
    /// Base URL, e.g. `https://coda.eumetsat.int`.
    pub base_url: String,

    pub credentials: Credentials,

    /// Immediate retries of the search request on connection failure.
    pub retries: u32,

    /// Timeout of the search request. Product downloads are never timed out.
    pub timeout: Option<Duration>,
}

impl HubSettings {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            retries: DEFAULT_RETRIES,
            timeout: None,
        }
    }

    /// Set the search retry count.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the search timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check credentials and the base URL.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.credentials.username.trim().is_empty() {
            return Err(ConfigurationError::MissingCredential("username"));
        }
        if self.credentials.password.is_empty() {
            return Err(ConfigurationError::MissingCredential("password"));
        }
        let url = self.endpoint("")?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigurationError::InvalidHubUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }

    /// The base URL with surrounding whitespace and trailing slashes removed.
    pub fn base(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// Resolve a path below the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ConfigurationError> {
        let raw = format!("{}/{}", self.base(), path);
        Url::parse(&raw).map_err(|e| ConfigurationError::InvalidHubUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }
}

/// One product entry from the search feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    /// Opaque id used to fetch the product content.
    pub uuid: String,
    /// Product name; encodes mission, sensor and acquisition time.
    pub identifier: String,
    /// Start of acquisition, as reported by the HUB.
    pub begin_position: String,
    /// End of acquisition, as reported by the HUB.
    pub end_position: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_settings_defaults() {
        let hub = HubSettings::new(DEFAULT_HUB_URL, Credentials::new("u", "p"));
        assert_eq!(hub.retries, 1);
        assert!(hub.timeout.is_none());
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let hub = HubSettings::new("https://hub.example.com/", Credentials::new("u", "p"));
        let url = hub.endpoint("search").unwrap();
        assert_eq!(url.as_str(), "https://hub.example.com/search");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let hub = HubSettings::new("https://hub.example.com/dhus", Credentials::new("u", "p"));
        let url = hub.endpoint("odata/v1/Products('abc')/$value").unwrap();
        assert_eq!(
            url.as_str(),
            "https://hub.example.com/dhus/odata/v1/Products('abc')/$value"
        );
    }

    #[test]
    fn test_validate_rejects_missing_password() {
        let hub = HubSettings::new(DEFAULT_HUB_URL, Credentials::new("u", ""));
        assert_eq!(
            hub.validate(),
            Err(ConfigurationError::MissingCredential("password"))
        );
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let hub = HubSettings::new("not a url", Credentials::new("u", "p"));
        assert!(matches!(
            hub.validate(),
            Err(ConfigurationError::InvalidHubUrl { .. })
        ));

        let hub = HubSettings::new("ftp://hub.example.com", Credentials::new("u", "p"));
        assert!(matches!(
            hub.validate(),
            Err(ConfigurationError::InvalidHubUrl { .. })
        ));
    }

    #[test]
    fn test_builder_pattern() {
        let hub = HubSettings::new(DEFAULT_HUB_URL, Credentials::new("u", "p"))
            .with_retries(3)
            .with_timeout(Some(Duration::from_secs(60)));
        assert_eq!(hub.retries, 3);
        assert_eq!(hub.timeout, Some(Duration::from_secs(60)));
    }
}
