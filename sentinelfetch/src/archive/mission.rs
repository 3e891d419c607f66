//! Acquisition time rules per Sentinel mission.
//!
//! This module implements the Strategy pattern: every mission has its own
//! [`AcquisitionTimeRule`], and [`MissionRules`] picks one by the two-letter
//! mission code at the start of a product identifier.

use chrono::NaiveDateTime;

use super::error::ResolveError;

/// Format of the timestamps embedded in product identifiers.
pub const IDENTIFIER_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Parse a `YYYYMMDDTHHMMSS` fragment.
fn parse_time(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, IDENTIFIER_TIME_FORMAT).ok()
}

/// Strategy for reading the acquisition time out of a product identifier.
pub trait AcquisitionTimeRule: Send + Sync {
    /// Two-letter mission code this rule handles, e.g. `S1`.
    fn mission(&self) -> &'static str;

    /// Extract the acquisition time.
    ///
    /// # Arguments
    ///
    /// * `identifier` - The full product identifier
    /// * `segments` - The identifier split on `_`
    fn acquisition_time(&self, identifier: &str, segments: &[&str]) -> Option<NaiveDateTime>;
}

/// Sentinel-1: segment 5.
#[derive(Debug, Default)]
pub struct Sentinel1Rule;

impl AcquisitionTimeRule for Sentinel1Rule {
    fn mission(&self) -> &'static str {
        "S1"
    }

    fn acquisition_time(&self, _identifier: &str, segments: &[&str]) -> Option<NaiveDateTime> {
        segments.get(5).and_then(|s| parse_time(s))
    }
}

/// Sentinel-2: segment 5 in the old naming, segment 6 in the compact naming.
#[derive(Debug, Default)]
pub struct Sentinel2Rule;

impl AcquisitionTimeRule for Sentinel2Rule {
    fn mission(&self) -> &'static str {
        "S2"
    }

    fn acquisition_time(&self, _identifier: &str, segments: &[&str]) -> Option<NaiveDateTime> {
        segments
            .get(5)
            .and_then(|s| parse_time(s))
            .or_else(|| segments.get(6).and_then(|s| parse_time(s)))
    }
}

/// Sentinel-3: fixed character range 16..31.
///
/// The mission/product prefix is padded with underscores, so segment
/// positions are not stable.
#[derive(Debug, Default)]
pub struct Sentinel3Rule;

impl AcquisitionTimeRule for Sentinel3Rule {
    fn mission(&self) -> &'static str {
        "S3"
    }

    fn acquisition_time(&self, identifier: &str, _segments: &[&str]) -> Option<NaiveDateTime> {
        identifier.get(16..31).and_then(parse_time)
    }
}

/// Table of acquisition time rules keyed by mission code.
pub struct MissionRules {
    rules: Vec<Box<dyn AcquisitionTimeRule>>,
}

impl Default for MissionRules {
    fn default() -> Self {
        Self::sentinel()
    }
}

impl MissionRules {
    /// An empty table.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Rules for Sentinel-1, -2 and -3.
    pub fn sentinel() -> Self {
        Self::empty()
            .with_rule(Sentinel1Rule)
            .with_rule(Sentinel2Rule)
            .with_rule(Sentinel3Rule)
    }

    /// Register a rule, replacing any rule for the same mission.
    pub fn with_rule(mut self, rule: impl AcquisitionTimeRule + 'static) -> Self {
        self.rules
            .retain(|r| !r.mission().eq_ignore_ascii_case(rule.mission()));
        self.rules.push(Box::new(rule));
        self
    }

    /// Mission codes with a registered rule.
    pub fn missions(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.mission()).collect()
    }

    /// Mission code of an identifier: the first two characters, upper-cased.
    pub fn mission_code(identifier: &str) -> Option<String> {
        let first = identifier.split('_').next()?;
        first.get(..2).map(str::to_ascii_uppercase)
    }

    /// Resolve the mission code and acquisition time of an identifier.
    pub fn acquisition_time(
        &self,
        identifier: &str,
    ) -> Result<(String, NaiveDateTime), ResolveError> {
        let unrecognized = || ResolveError::UnrecognizedMission {
            identifier: identifier.to_string(),
        };

        let code = Self::mission_code(identifier).ok_or_else(unrecognized)?;
        let rule = self
            .rules
            .iter()
            .find(|r| r.mission().eq_ignore_ascii_case(&code))
            .ok_or_else(unrecognized)?;

        let segments: Vec<&str> = identifier.split('_').collect();
        let time = rule
            .acquisition_time(identifier, &segments)
            .ok_or_else(|| ResolveError::UnparseableTimestamp {
                identifier: identifier.to_string(),
                mission: code.clone(),
            })?;

        Ok((code, time))
    }
}

impl std::fmt::Debug for MissionRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MissionRules")
            .field("missions", &self.missions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    const S1_ID: &str = "S1A_IW_GRDH_1SDV_20181001T055140_20181001T055205_023931_029CE0_5A2B";
    const S2_OLD_ID: &str =
        "S2A_OPER_PRD_MSIL1C_PDMC_20160101T120000_R094_V20151231T103212_20151231T103212";
    const S2_COMPACT_ID: &str = "S2A_MSIL1C_20181001T105021_N0206_R051_T31UDQ_20181001T143012";
    const S3_ID: &str = "S3A_OL_2_WFR____20181001T101010_20181001T101310_20181002T120000_0179_036_222_2160_MAR_O_NT_002";

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn segments(id: &str) -> Vec<&str> {
        id.split('_').collect()
    }

    #[test]
    fn test_sentinel1_uses_segment_five() {
        let time = Sentinel1Rule.acquisition_time(S1_ID, &segments(S1_ID));
        assert_eq!(time, Some(at(2018, 10, 1, 5, 52, 5)));
    }

    #[test]
    fn test_sentinel1_short_identifier() {
        let id = "S1A_IW_GRDH";
        assert_eq!(Sentinel1Rule.acquisition_time(id, &segments(id)), None);
    }

    #[test]
    fn test_sentinel2_old_naming() {
        let time = Sentinel2Rule.acquisition_time(S2_OLD_ID, &segments(S2_OLD_ID));
        assert_eq!(time, Some(at(2016, 1, 1, 12, 0, 0)));
    }

    #[test]
    fn test_sentinel2_falls_back_to_segment_six() {
        let time = Sentinel2Rule.acquisition_time(S2_COMPACT_ID, &segments(S2_COMPACT_ID));
        assert_eq!(time, Some(at(2018, 10, 1, 14, 30, 12)));
    }

    #[test]
    fn test_sentinel3_fixed_offset() {
        assert_eq!(&S3_ID[16..31], "20181001T101010");
        let time = Sentinel3Rule.acquisition_time(S3_ID, &segments(S3_ID));
        assert_eq!(time, Some(at(2018, 10, 1, 10, 10, 10)));
    }

    #[test]
    fn test_sentinel3_short_identifier() {
        assert_eq!(Sentinel3Rule.acquisition_time("S3A_OL", &[]), None);
    }

    #[test]
    fn test_mission_code_is_case_insensitive() {
        assert_eq!(MissionRules::mission_code("s3b_SL_2"), Some("S3".to_string()));
        assert_eq!(MissionRules::mission_code("X"), None);
    }

    #[test]
    fn test_unknown_mission() {
        let rules = MissionRules::sentinel();
        let err = rules
            .acquisition_time("LC08_L1TP_204024_20181001_20181001_01_RT")
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnrecognizedMission { .. }));
    }

    #[test]
    fn test_unparseable_timestamp() {
        let rules = MissionRules::sentinel();
        let err = rules.acquisition_time("S2A_MSIL1C_garbage").unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnparseableTimestamp {
                identifier: "S2A_MSIL1C_garbage".to_string(),
                mission: "S2".to_string(),
            }
        );
    }

    #[test]
    fn test_custom_rule_registration() {
        struct Sentinel5Rule;
        impl AcquisitionTimeRule for Sentinel5Rule {
            fn mission(&self) -> &'static str {
                "S5"
            }
            fn acquisition_time(&self, _id: &str, segments: &[&str]) -> Option<NaiveDateTime> {
                segments.last().and_then(|s| parse_time(s))
            }
        }

        let rules = MissionRules::sentinel().with_rule(Sentinel5Rule);
        assert_eq!(rules.missions(), vec!["S1", "S2", "S3", "S5"]);

        let (code, time) = rules
            .acquisition_time("S5P_OFFL_L2__NO2_20181001T101010")
            .unwrap();
        assert_eq!(code, "S5");
        assert_eq!(time, at(2018, 10, 1, 10, 10, 10));
    }

    #[test]
    fn test_with_rule_replaces_existing_mission() {
        let rules = MissionRules::sentinel().with_rule(Sentinel1Rule);
        assert_eq!(rules.missions(), vec!["S2", "S3", "S1"]);
    }
}
