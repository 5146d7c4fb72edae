//! Inclusive timestamp window used by `filter_by_date_range`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// `[start, end]`, both inclusive; a missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, AnalysisError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(AnalysisError::InvalidDateRange {
                    start: s.to_rfc3339(),
                    end: e.to_rfc3339(),
                });
            }
        }
        Ok(Self { start, end })
    }

    /// `[now - days, now]`. Fails when the start falls outside the representable dates.
    pub fn last_days(days: u32, now: DateTime<Utc>) -> Result<Self, AnalysisError> {
        let start = Duration::try_days(i64::from(days))
            .and_then(|span| now.checked_sub_signed(span))
            .ok_or_else(|| {
                AnalysisError::DateOutOfRange(format!("{} days before {}", days, now.to_rfc3339()))
            })?;
        Ok(Self {
            start: Some(start),
            end: Some(now),
        })
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| ts >= start) && self.end.map_or(true, |end| ts <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bounds_are_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let range = DateRange::new(Some(start), Some(end)).unwrap();
        assert!(range.contains(start));
        assert!(range.contains(end));
        assert!(!range.contains(start - Duration::seconds(1)));
        assert!(!range.contains(end + Duration::seconds(1)));
    }

    #[test]
    fn test_open_bounds() {
        let ts = Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
        assert!(DateRange::default().contains(ts));
        let since = DateRange::new(Some(ts), None).unwrap();
        assert!(since.contains(ts + Duration::days(3650)));
        assert!(!since.contains(ts - Duration::days(1)));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let a = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            DateRange::new(Some(a), Some(b)),
            Err(AnalysisError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_last_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let range = DateRange::last_days(7, now).unwrap();
        assert_eq!(range.start, Some(Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap()));
        assert_eq!(range.end, Some(now));
    }

    #[test]
    fn test_last_days_beyond_calendar_is_error() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        assert!(matches!(
            DateRange::last_days(u32::MAX, now),
            Err(AnalysisError::DateOutOfRange(_))
        ));
    }

    #[test]
    fn test_serializes_iso8601() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let json = serde_json::to_value(DateRange::last_days(1, now).unwrap()).unwrap();
        assert_eq!(json["end"], "2024-03-15T12:00:00Z");
        assert_eq!(json["start"], "2024-03-14T12:00:00Z");
    }
}
