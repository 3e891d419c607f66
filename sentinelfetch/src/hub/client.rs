//! HUB client: search requests and product content requests.

use reqwest::Url;

use super::error::{HubError, HubResult};
use super::feed::parse_feed;
use super::http::{HubResponse, HubTransport, RequestOptions};
use super::types::{HubSettings, ProductRecord};
use crate::query::QueryParameters;
use crate::report::{Reporter, RunEvent};

/// Client for one HUB, reused for every request of a run.
pub struct HubClient {
    transport: Box<dyn HubTransport>,
    settings: HubSettings,
}

impl HubClient {
    pub fn new(transport: Box<dyn HubTransport>, settings: HubSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn settings(&self) -> &HubSettings {
        &self.settings
    }

    /// Run the search and return its records in feed order.
    ///
    /// A failed request, a non-200 answer or an unreadable feed is reported
    /// and yields no records. Only a result set that reaches the row limit
    /// is an error.
    pub fn search(
        &self,
        params: &QueryParameters,
        reporter: &dyn Reporter,
    ) -> HubResult<Vec<ProductRecord>> {
        reporter.report(RunEvent::QueryIssued {
            hub: self.settings.base().to_string(),
            query: params.query_string(),
        });

        let records = match self.fetch_records(params, reporter) {
            Ok(records) => records,
            Err(e) => {
                reporter.report(RunEvent::QueryFailed {
                    hub: self.settings.base().to_string(),
                    reason: format!("{} ({} retries)", e, self.settings.retries),
                });
                return Ok(Vec::new());
            }
        };

        if records.len() >= params.max_rows() {
            reporter.report(RunEvent::QueryTooLarge {
                count: records.len(),
                max_rows: params.max_rows(),
            });
            return Err(HubError::QueryTooLarge {
                count: records.len(),
                max_rows: params.max_rows(),
            });
        }

        reporter.report(RunEvent::QueryResults {
            count: records.len(),
        });
        Ok(records)
    }

    fn fetch_records(
        &self,
        params: &QueryParameters,
        reporter: &dyn Reporter,
    ) -> HubResult<Vec<ProductRecord>> {
        let url = params
            .search_url()
            .map_err(|e| HubError::InvalidUrl(e.to_string()))?;
        let options = RequestOptions {
            timeout: self.settings.timeout,
            retries: self.settings.retries,
        };

        let response = self
            .transport
            .get(&url, &self.settings.credentials, options)?;

        reporter.report(RunEvent::QueryResponse {
            hub: self.settings.base().to_string(),
            status: response.status(),
        });

        if response.status() != 200 {
            return Err(HubError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let body = response.bytes().map_err(|e| HubError::Transport {
            url: url.to_string(),
            reason: format!("failed to read response: {}", e),
        })?;

        parse_feed(&body)
    }

    /// Content URL of a product.
    pub fn product_url(&self, uuid: &str) -> HubResult<Url> {
        self.settings
            .endpoint(&format!("odata/v1/Products('{}')/$value", uuid))
            .map_err(|e| HubError::InvalidUrl(e.to_string()))
    }

    /// Open the content stream of a product.
    ///
    /// No timeout and no retries apply to downloads.
    pub fn open_product(&self, url: &Url) -> HubResult<HubResponse> {
        self.transport
            .get(url, &self.settings.credentials, RequestOptions::default())
    }
}

impl std::fmt::Debug for HubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubClient")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::hub::feed::tests::{entry, feed};
    use crate::hub::http::tests::{MockReply, MockTransport};
    use crate::hub::Credentials;
    use crate::query::{FixedClock, SearchRequest};
    use crate::report::MemoryReporter;

    fn settings() -> HubSettings {
        HubSettings::new("https://hub.example.com", Credentials::new("user", "pass"))
            .with_retries(2)
            .with_timeout(Some(Duration::from_secs(30)))
    }

    fn params(max_rows: usize) -> QueryParameters {
        let request = SearchRequest {
            footprint: Some("50,-10:51,-9".to_string()),
            ..Default::default()
        };
        let clock = FixedClock(Utc.with_ymd_and_hms(2018, 10, 2, 0, 0, 0).unwrap());
        QueryParameters::build(&request, settings(), max_rows, &clock).unwrap()
    }

    fn entries(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| entry(&format!("uuid-{}", i), "S1A_IW_GRDH_1SDV_20181001T055140_20181001T055205"))
            .collect()
    }

    #[test]
    fn test_search_returns_records() {
        let transport = MockTransport::new().route("/search", MockReply::ok(feed(&entries(3))));
        let client = HubClient::new(Box::new(transport), settings());
        let reporter = MemoryReporter::new();

        let records = client.search(&params(99), &reporter).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].uuid, "uuid-2");
        assert!(reporter
            .events()
            .contains(&RunEvent::QueryResults { count: 3 }));
    }

    #[test]
    fn test_search_uses_timeout_and_retries() {
        let transport = Arc::new(MockTransport::new().route("/search", MockReply::ok(feed(&[]))));
        let client = HubClient::new(Box::new(Arc::clone(&transport)), settings());
        client.search(&params(99), &MemoryReporter::new()).unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].0.contains("/search?q="));
        assert_eq!(requests[0].1.retries, 2);
        assert_eq!(requests[0].1.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_row_limit_reached_is_query_too_large() {
        let transport = MockTransport::new().route("/search", MockReply::ok(feed(&entries(5))));
        let client = HubClient::new(Box::new(transport), settings());
        let reporter = MemoryReporter::new();

        let err = client.search(&params(5), &reporter).unwrap_err();
        assert!(matches!(
            err,
            HubError::QueryTooLarge {
                count: 5,
                max_rows: 5
            }
        ));
        assert_eq!(reporter.errors().len(), 1);
    }

    #[test]
    fn test_below_row_limit_is_fine() {
        let transport = MockTransport::new().route("/search", MockReply::ok(feed(&entries(4))));
        let client = HubClient::new(Box::new(transport), settings());
        let records = client.search(&params(5), &MemoryReporter::new()).unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_non_200_yields_no_records() {
        let transport = MockTransport::new().route("/search", MockReply::status(503));
        let client = HubClient::new(Box::new(transport), settings());
        let reporter = MemoryReporter::new();

        let records = client.search(&params(99), &reporter).unwrap();
        assert!(records.is_empty());
        assert!(reporter.events().contains(&RunEvent::QueryResponse {
            hub: "https://hub.example.com".to_string(),
            status: 503,
        }));
        assert_eq!(reporter.errors().len(), 1);
    }

    #[test]
    fn test_connection_failure_yields_no_records() {
        let transport = MockTransport::new().route("/search", MockReply::ConnectionFailed);
        let client = HubClient::new(Box::new(transport), settings());
        let reporter = MemoryReporter::new();

        let records = client.search(&params(99), &reporter).unwrap();
        assert!(records.is_empty());
        assert!(matches!(
            reporter.errors()[0],
            RunEvent::QueryFailed { ref reason, .. } if reason.contains("2 retries")
        ));
    }

    #[test]
    fn test_malformed_feed_yields_no_records() {
        let transport = MockTransport::new().route("/search", MockReply::ok("<feed><entry>"));
        let client = HubClient::new(Box::new(transport), settings());
        let records = client.search(&params(99), &MemoryReporter::new()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_product_url() {
        let client = HubClient::new(Box::new(MockTransport::new()), settings());
        let url = client.product_url("8b5e-44c1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://hub.example.com/odata/v1/Products('8b5e-44c1')/$value"
        );
    }
}
