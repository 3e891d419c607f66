//! sentinelfetch - Sentinel product downloader
//!
//! This library queries a Sentinel data HUB, parses the search feed, files
//! every product into a local archive (optionally partitioned by acquisition
//! date) and streams the product files there one at a time.
//!
//! The pipeline is linear:
//!
//! 1. [`query`] builds the search from footprint, dates and filters
//! 2. [`hub`] runs the search and parses the feed into records
//! 3. [`archive`] works out each record's archive directory
//! 4. [`download`] streams each product into that directory
//! 5. [`run`] ties the steps together and collects per-record outcomes
//!
//! Progress and problems are reported through [`report::Reporter`].

pub mod archive;
pub mod config;
pub mod download;
pub mod hub;
pub mod logging;
pub mod query;
pub mod report;
pub mod run;
