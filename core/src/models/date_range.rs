use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{Error, Result};

/// Inclusive bounds used to filter favorites by creation date.
///
/// A missing bound is unconstrained, so `DateRange::default()` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    /// Parse optional textual bounds. Empty strings count as absent.
    ///
    /// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM[:SS[.fff]]` (taken as UTC) or a
    /// plain `YYYY-MM-DD` (UTC midnight). Anything else is a validation error.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self> {
        Ok(Self {
            from: parse_bound(from)?,
            to: parse_bound(to)?,
        })
    }

    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        if self.from.is_some_and(|from| *date < from) {
            return false;
        }
        if self.to.is_some_and(|to| *date > to) {
            return false;
        }
        true
    }
}

fn parse_bound(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(date.with_timezone(&Utc)));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(date.and_utc()));
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(Some(midnight.and_utc()));
        }
    }

    Err(Error::Validation(format!("invalid date bound: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        for raw in [
            "2024-03-01",
            "2024-03-01T00:00",
            "2024-03-01T00:00:00",
            "2024-03-01T00:00:00.000Z",
            "2024-03-01T01:00:00+01:00",
        ] {
            let range = DateRange::parse(Some(raw), None).unwrap();
            assert_eq!(range.from, Some(expected), "{raw}");
        }
    }

    #[test]
    fn test_empty_bounds_are_absent() {
        let range = DateRange::parse(Some(""), Some("  ")).unwrap();
        assert_eq!(range, DateRange::default());
    }

    #[test]
    fn test_malformed_bound_is_rejected() {
        let err = DateRange::parse(None, Some("not-a-date")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let range = DateRange::new(Some(from), Some(to));

        assert!(range.contains(&from));
        assert!(range.contains(&to));
        assert!(!range.contains(&(to + chrono::Duration::milliseconds(1))));
        assert!(!range.contains(&(from - chrono::Duration::milliseconds(1))));
    }
}
