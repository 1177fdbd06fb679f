use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const INVALID_BOUND: &str = "Enter a valid date (YYYY-MM-DD) or RFC 3339 date/time.";

/// Inclusive `order_date` bounds taken from `?from=` / `?to=`.
///
/// A bare date as the upper bound covers that whole day: it resolves to the
/// last microsecond before the next midnight, which is the finest instant
/// Postgres stores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    raw_from: Option<String>,
    raw_to: Option<String>,
}

/// The filter as the caller wrote it, echoed back by the reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeEcho {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl DateRange {
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self> {
        let raw_from = from.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
        let raw_to = to.map(str::trim).filter(|s| !s.is_empty()).map(String::from);

        let from = match raw_from.as_deref() {
            Some(raw) => Some(
                parse_lower_bound(raw).ok_or_else(|| Error::field("from", "invalid", INVALID_BOUND))?,
            ),
            None => None,
        };
        let to = match raw_to.as_deref() {
            Some(raw) => Some(
                parse_upper_bound(raw).ok_or_else(|| Error::field("to", "invalid", INVALID_BOUND))?,
            ),
            None => None,
        };

        Ok(Self {
            from,
            to,
            raw_from,
            raw_to,
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    #[cfg(test)]
    fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }

    pub fn echo(&self) -> Option<DateRangeEcho> {
        if self.is_unbounded() {
            return None;
        }
        Some(DateRangeEcho {
            from: self.raw_from.clone(),
            to: self.raw_to.clone(),
        })
    }
}

pub fn parse_lower_bound(raw: &str) -> Option<DateTime<Utc>> {
    if let Some(instant) = parse_instant(raw) {
        return Some(instant);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(start_of(date))
}

pub fn parse_upper_bound(raw: &str) -> Option<DateTime<Utc>> {
    if let Some(instant) = parse_instant(raw) {
        return Some(instant);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let next_day = date.succ_opt()?;
    Some(start_of(next_day) - Duration::microseconds(1))
}

/// RFC 3339, or a naive `YYYY-MM-DD[T ]HH:MM:SS[.f]` read as UTC.
fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn start_of(date: NaiveDate) -> DateTime<Utc> {
    let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap_or_default();
    Utc.from_utc_datetime(&date.and_time(midnight))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn date_only_bounds_cover_whole_days() {
        let range = DateRange::parse(Some("2024-03-01"), Some("2024-03-31")).unwrap();
        assert!(range.contains(at("2024-03-01T00:00:00Z")));
        assert!(range.contains(at("2024-03-31T23:59:59.999999Z")));
        assert!(!range.contains(at("2024-04-01T00:00:00Z")));
        assert!(!range.contains(at("2024-02-29T23:59:59Z")));
    }

    #[test]
    fn timestamp_bounds_are_inclusive() {
        let range =
            DateRange::parse(Some("2024-03-01T10:00:00Z"), Some("2024-03-01T12:00:00+00:00"))
                .unwrap();
        assert!(range.contains(at("2024-03-01T10:00:00Z")));
        assert!(range.contains(at("2024-03-01T12:00:00Z")));
        assert!(!range.contains(at("2024-03-01T12:00:00.000001Z")));
    }

    #[test]
    fn single_bound_leaves_other_side_open() {
        let range = DateRange::parse(Some("2024-03-01"), None).unwrap();
        assert!(range.contains(at("2999-01-01T00:00:00Z")));
        assert!(!range.contains(at("2024-02-01T00:00:00Z")));
        assert_eq!(
            range.echo(),
            Some(DateRangeEcho {
                from: Some("2024-03-01".into()),
                to: None
            })
        );
    }

    #[test]
    fn blank_bounds_are_ignored() {
        let range = DateRange::parse(Some(""), Some("  ")).unwrap();
        assert!(range.is_unbounded());
        assert_eq!(range.echo(), None);
    }

    #[test]
    fn garbage_bound_is_a_field_error() {
        let err = DateRange::parse(None, Some("yesterday")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
