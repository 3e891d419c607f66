//! Search query construction.
//!
//! Turns the user's footprint, date tokens and attribute filters into the
//! `field:value AND ...` query understood by the HUB search endpoint.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use sentinelfetch::hub::{Credentials, HubSettings};
//! use sentinelfetch::query::{FixedClock, QueryParameters, SearchRequest};
//!
//! let request = SearchRequest {
//!     footprint: Some("50.0,-10.0:51.0,-9.0".to_string()),
//!     date_from: Some("20181001".to_string()),
//!     ..Default::default()
//! };
//! let hub = HubSettings::new("https://hub.example.com", Credentials::new("user", "pass"));
//! let clock = FixedClock(Utc.with_ymd_and_hms(2018, 10, 2, 0, 0, 0).unwrap());
//!
//! let params = QueryParameters::build(&request, hub, 99, &clock).unwrap();
//! assert!(params.query_string().starts_with("footprint:"));
//! ```

mod builder;
mod date;
mod error;
mod footprint;

pub use builder::{QueryParameters, SearchFilters, SearchRequest, DEFAULT_MAX_ROWS};
pub use date::{format_hub_time, Bound, Clock, DateRange, DateToken, FixedClock, SystemClock};
pub use error::ConfigurationError;
pub use footprint::{Corner, Footprint};
