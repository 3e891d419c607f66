//! HTTP transport abstraction for testability

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tracing::debug;

use super::error::{HubError, HubResult};
use super::types::Credentials;

/// Per-request transport options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Overall request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Immediate retries on connection failure, without backoff.
    pub retries: u32,
}

/// A HUB response with a streaming body.
pub struct HubResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Box<dyn Read + Send>,
}

impl HubResponse {
    /// Header names are matched case-insensitively.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Box<dyn Read + Send>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// First value of a header, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The body as a reader.
    pub fn body_mut(&mut self) -> &mut (dyn Read + Send) {
        self.body.as_mut()
    }

    /// Read the whole body into memory.
    pub fn bytes(mut self) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.body.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl std::fmt::Debug for HubResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Trait for authenticated HTTP GET requests against the HUB.
///
/// This abstraction allows the HUB client and downloader to be tested
/// without a network.
pub trait HubTransport: Send + Sync {
    /// Performs an authenticated GET request.
    ///
    /// Any HTTP status is returned as a response; only failures to obtain a
    /// response at all are errors.
    fn get(
        &self,
        url: &Url,
        credentials: &Credentials,
        options: RequestOptions,
    ) -> HubResult<HubResponse>;
}

impl<T: HubTransport + ?Sized> HubTransport for Arc<T> {
    fn get(
        &self,
        url: &Url,
        credentials: &Credentials,
        options: RequestOptions,
    ) -> HubResult<HubResponse> {
        (**self).get(url, credentials, options)
    }
}

/// Real transport using a single blocking reqwest client.
///
/// The client keeps its connection pool for the whole run, so the search and
/// every download share one session.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Creates a transport without a global timeout.
    pub fn new() -> HubResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| HubError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HubTransport for ReqwestTransport {
    fn get(
        &self,
        url: &Url,
        credentials: &Credentials,
        options: RequestOptions,
    ) -> HubResult<HubResponse> {
        let mut attempt = 0;
        let response = loop {
            let mut request = self
                .client
                .get(url.clone())
                .basic_auth(&credentials.username, Some(&credentials.password));
            if let Some(timeout) = options.timeout {
                request = request.timeout(timeout);
            }

            match request.send() {
                Ok(response) => break response,
                Err(e) if e.is_connect() && attempt < options.retries => {
                    attempt += 1;
                    debug!(url = %url, attempt, error = %e, "Connection failed, retrying");
                }
                Err(e) => {
                    return Err(HubError::Transport {
                        url: url.to_string(),
                        reason: e.to_string(),
                    })
                }
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        Ok(HubResponse::new(status, headers, Box::new(response)))
    }
}
