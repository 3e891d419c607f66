//! Data HUB access.
//!
//! The HUB exposes two endpoints that this module wraps:
//! - `<hub>/search?q=...&rows=N&start=0` returning an Atom feed of products
//! - `<hub>/odata/v1/Products('<uuid>')/$value` streaming a product file
//!
//! All requests use HTTP Basic authentication and go through a
//! [`HubTransport`], which is [`ReqwestTransport`] outside of tests.

mod client;
mod error;
mod feed;
mod http;
mod types;

pub use client::HubClient;
pub use error::{HubError, HubResult};
pub use feed::{parse_feed, strip_default_namespace};
pub use http::{HubResponse, HubTransport, ReqwestTransport, RequestOptions};
pub use types::{Credentials, HubSettings, ProductRecord, DEFAULT_HUB_URL, DEFAULT_RETRIES};

#[cfg(test)]
pub(crate) use feed::tests::{entry as feed_entry, feed as feed_document};
#[cfg(test)]
pub use http::tests::{MockReply, MockTransport};
