//! Rectangular search footprints.

use std::fmt;
use std::str::FromStr;

use super::error::ConfigurationError;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub lat: f64,
    pub lon: f64,
}

/// A bounding box given by two opposite corners.
///
/// Parsed from `lat1,lon1:lat2,lon2`. The corners are kept as given; the
/// polygon is built from them without reordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub first: Corner,
    pub second: Corner,
}

impl Footprint {
    pub fn new(first: Corner, second: Corner) -> Self {
        Self { first, second }
    }

    /// The closed ring of the footprint polygon as `(lon, lat)` pairs.
    ///
    /// Always five points, the last one repeating the first.
    pub fn ring(&self) -> [(f64, f64); 5] {
        let Corner { lat: lat1, lon: lon1 } = self.first;
        let Corner { lat: lat2, lon: lon2 } = self.second;
        [
            (lon1, lat1),
            (lon2, lat1),
            (lon2, lat2),
            (lon1, lat2),
            (lon1, lat1),
        ]
    }

    /// Well-known-text polygon of the footprint.
    pub fn to_wkt(&self) -> String {
        let points: Vec<String> = self
            .ring()
            .iter()
            .map(|(lon, lat)| format!("{} {}", lon, lat))
            .collect();
        format!("POLYGON(({}))", points.join(","))
    }

    /// The quoted intersects predicate used as the `footprint` clause value.
    pub fn clause_value(&self) -> String {
        format!("\"Intersects({})\"", self.to_wkt())
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}:{},{}",
            self.first.lat, self.first.lon, self.second.lat, self.second.lon
        )
    }
}

impl FromStr for Footprint {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(ConfigurationError::MissingFootprint);
        }

        let invalid = |reason: &str| ConfigurationError::InvalidFootprint {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        let (first, second) = text
            .split_once(':')
            .ok_or_else(|| invalid("expected two corners separated by ':'"))?;

        let parse_corner = |corner: &str| -> Result<Corner, ConfigurationError> {
            let (lat, lon) = corner
                .split_once(',')
                .ok_or_else(|| invalid("expected a corner as lat,lon"))?;
            let lat = lat
                .trim()
                .parse::<f64>()
                .map_err(|_| invalid("latitude is not a number"))?;
            let lon = lon
                .trim()
                .parse::<f64>()
                .map_err(|_| invalid("longitude is not a number"))?;
            if !lat.is_finite() || !lon.is_finite() {
                return Err(invalid("coordinates must be finite"));
            }
            Ok(Corner { lat, lon })
        };

        Ok(Footprint::new(parse_corner(first)?, parse_corner(second)?))
    }
}
