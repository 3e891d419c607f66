//! Date tokens used for the acquisition window of a search.
//!
//! A token is one of:
//! - `YYYYMMDD` - a calendar day (midnight as a start bound, end of day as an end bound)
//! - `YYYYMMDDTHHMMSS` - an exact UTC time
//! - `NOW` or `NOW-<days>` - relative to the clock at run start

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use super::error::ConfigurationError;

const DATE_FORMAT: &str = "%Y%m%d";
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Source of the current time.
///
/// Relative tokens are evaluated against a clock so tests can pin "now".
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Which end of the window a token is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// A parsed date token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateToken {
    /// `NOW` minus a number of days (zero for plain `NOW`).
    Now { days_ago: i64 },
    /// A calendar day without a time.
    Day(NaiveDate),
    /// A full timestamp.
    Timestamp(NaiveDateTime),
}

impl DateToken {
    /// Parse a token, rejecting anything that is not one of the accepted forms.
    pub fn parse(token: &str) -> Result<Self, ConfigurationError> {
        let token = token.trim();
        let invalid = |reason: &str| ConfigurationError::InvalidDate {
            token: token.to_string(),
            reason: reason.to_string(),
        };

        if token.is_empty() {
            return Err(invalid("date not set"));
        }

        let is_relative = token
            .get(..3)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("NOW"));
        if is_relative {
            let rest = &token[3..];
            if rest.is_empty() {
                return Ok(DateToken::Now { days_ago: 0 });
            }
            let days = rest
                .strip_prefix('-')
                .ok_or_else(|| invalid("expected NOW or NOW-<days>"))?;
            let days_ago = days
                .parse::<u32>()
                .map_err(|_| invalid("day offset is not a number"))?;
            return Ok(DateToken::Now {
                days_ago: i64::from(days_ago),
            });
        }

        if token.len() == 8 {
            return NaiveDate::parse_from_str(token, DATE_FORMAT)
                .map(DateToken::Day)
                .map_err(|_| invalid("expected YYYYMMDD"));
        }

        NaiveDateTime::parse_from_str(token, TIMESTAMP_FORMAT)
            .map(DateToken::Timestamp)
            .map_err(|_| invalid("expected YYYYMMDD or YYYYMMDDTHHMMSS"))
    }

    /// Resolve the token to an instant.
    ///
    /// A calendar day used as an end bound covers the whole day, up to
    /// 23:59:59.999. A day offset reaching past the representable range is
    /// rejected.
    pub fn resolve(
        &self,
        bound: Bound,
        clock: &dyn Clock,
    ) -> Result<DateTime<Utc>, ConfigurationError> {
        match *self {
            DateToken::Now { days_ago } => clock
                .now()
                .checked_sub_signed(Duration::days(days_ago))
                .ok_or_else(|| ConfigurationError::InvalidDate {
                    token: format!("NOW-{}", days_ago),
                    reason: "day offset out of range".to_string(),
                }),
            DateToken::Day(day) => {
                let time = match bound {
                    Bound::Start => NaiveTime::MIN,
                    Bound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
                        .unwrap_or(NaiveTime::MIN),
                };
                Ok(Utc.from_utc_datetime(&day.and_time(time)))
            }
            DateToken::Timestamp(ts) => Ok(Utc.from_utc_datetime(&ts)),
        }
    }
}

/// Format an instant the way the HUB expects inside a range clause.
pub fn format_hub_time(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Acquisition window of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// Build a window from optional tokens.
    ///
    /// When only one side is given it is used for both. Returns `None` when
    /// neither side is given. Both sides see the same reading of `clock`.
    pub fn from_tokens(
        from: Option<&str>,
        to: Option<&str>,
        clock: &dyn Clock,
    ) -> Result<Option<Self>, ConfigurationError> {
        let from = from.map(str::trim).filter(|s| !s.is_empty());
        let to = to.map(str::trim).filter(|s| !s.is_empty());

        let (from, to) = match (from, to) {
            (None, None) => return Ok(None),
            (Some(f), None) => (f, f),
            (None, Some(t)) => (t, t),
            (Some(f), Some(t)) => (f, t),
        };

        let run_start = FixedClock(clock.now());
        let from = DateToken::parse(from)?.resolve(Bound::Start, &run_start)?;
        let to = DateToken::parse(to)?.resolve(Bound::End, &run_start)?;
        Ok(Some(Self { from, to }))
    }

    /// The `[from TO to]` clause value.
    pub fn clause_value(&self) -> String {
        format!(
            "[{} TO {}]",
            format_hub_time(&self.from),
            format_hub_time(&self.to)
        )
    }
}
