//! Assembly of HUB search queries.

use reqwest::Url;

use super::date::{Clock, DateRange};
use super::error::ConfigurationError;
use super::footprint::Footprint;
use crate::hub::HubSettings;

/// Default maximum number of rows requested from the HUB.
///
/// HUBs typically cap a page at 100 rows, so one less is requested and a full
/// page is treated as a truncated result.
pub const DEFAULT_MAX_ROWS: usize = 99;

/// Optional attribute filters for a search.
///
/// Empty strings are treated the same as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub sensor_operational_mode: Option<String>,
    pub product_type: Option<String>,
    pub platform_name: Option<String>,
    pub polarisation_mode: Option<String>,
    pub relative_orbit: Option<String>,
    pub absolute_orbit: Option<String>,
}

impl SearchFilters {
    /// Filter clauses in HUB field order, skipping unset values.
    fn clauses(&self) -> Vec<(&'static str, String)> {
        [
            ("sensoroperationalmode", &self.sensor_operational_mode),
            ("producttype", &self.product_type),
            ("platformname", &self.platform_name),
            ("polarisationmode", &self.polarisation_mode),
            ("relativeorbitnumber", &self.relative_orbit),
            ("orbitnumber", &self.absolute_orbit),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (field, v.to_string()))
        })
        .collect()
    }
}

/// What the user asked for, before validation.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    /// Footprint text, `lat1,lon1:lat2,lon2`.
    pub footprint: Option<String>,
    /// Start of the acquisition window.
    pub date_from: Option<String>,
    /// End of the acquisition window.
    pub date_to: Option<String>,
    pub filters: SearchFilters,
}

/// A validated search, built once per run.
#[derive(Debug, Clone)]
pub struct QueryParameters {
    clauses: Vec<(&'static str, String)>,
    footprint: Footprint,
    date_range: Option<DateRange>,
    max_rows: usize,
    hub: HubSettings,
}

impl QueryParameters {
    /// Validate a request and freeze it into query parameters.
    ///
    /// Relative date tokens are evaluated against `clock` here, once.
    pub fn build(
        request: &SearchRequest,
        hub: HubSettings,
        max_rows: usize,
        clock: &dyn Clock,
    ) -> Result<Self, ConfigurationError> {
        let footprint: Footprint = request
            .footprint
            .as_deref()
            .ok_or(ConfigurationError::MissingFootprint)?
            .parse()?;

        if max_rows == 0 {
            return Err(ConfigurationError::InvalidRowLimit);
        }

        hub.validate()?;

        let date_range = DateRange::from_tokens(
            request.date_from.as_deref(),
            request.date_to.as_deref(),
            clock,
        )?;

        let mut clauses = request.filters.clauses();
        clauses.push(("footprint", footprint.clause_value()));
        if let Some(range) = &date_range {
            clauses.push(("beginPosition", range.clause_value()));
        }

        Ok(Self {
            clauses,
            footprint,
            date_range,
            max_rows,
            hub,
        })
    }

    /// `field:value` clauses joined with `AND`.
    pub fn query_string(&self) -> String {
        self.clauses
            .iter()
            .map(|(field, value)| format!("{}:{}", field, value))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Full search URL with encoded query, row count and start offset.
    pub fn search_url(&self) -> Result<Url, ConfigurationError> {
        let mut url = self.hub.endpoint("search")?;
        url.query_pairs_mut()
            .append_pair("q", &self.query_string())
            .append_pair("rows", &self.max_rows.to_string())
            .append_pair("start", "0");
        Ok(url)
    }

    pub fn clauses(&self) -> &[(&'static str, String)] {
        &self.clauses
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn hub(&self) -> &HubSettings {
        &self.hub
    }
}
