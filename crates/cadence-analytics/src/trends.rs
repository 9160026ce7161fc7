//! Productivity trend buckets: one point per calendar day per department.

use std::collections::BTreeMap;

use serde::Serialize;
use time::OffsetDateTime;

use cadence_core::{AnalysisError, UpdateSource};

use crate::rollup::{day_key, department_of, mean, roster, updates_in_window};

/// Accepted trend windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeRange {
    pub fn parse(s: &str) -> Result<Self, AnalysisError> {
        match s {
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "quarter" => Ok(TimeRange::Quarter),
            "year" => Ok(TimeRange::Year),
            other => Err(AnalysisError::invalid_parameter(format!(
                "invalid time range {other:?} (expected week, month, quarter, or year)"
            ))),
        }
    }

    pub fn days(self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
            TimeRange::Year => 365,
        }
    }
}

/// One (day, department) aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendBucket {
    pub date: String,
    pub productivity: f64,
    pub updates: usize,
    pub department: String,
}

/// Average productivity and update volume per day per department over
/// the window, ascending by date. `department` of `None` means all.
pub fn productivity_trends(
    source: &dyn UpdateSource,
    range: TimeRange,
    department: Option<&str>,
) -> Result<Vec<TrendBucket>, AnalysisError> {
    productivity_trends_at(source, range, department, OffsetDateTime::now_utc())
}

pub fn productivity_trends_at(
    source: &dyn UpdateSource,
    range: TimeRange,
    department: Option<&str>,
    now: OffsetDateTime,
) -> Result<Vec<TrendBucket>, AnalysisError> {
    let updates = updates_in_window(source, range.days(), now)?;
    let members = roster(source)?;

    let mut buckets: BTreeMap<(String, String), Vec<f64>> = BTreeMap::new();
    for update in &updates {
        let dept = department_of(&members, &update.author);
        if department.is_some_and(|d| d != dept) {
            continue;
        }
        buckets
            .entry((day_key(update)?, dept.to_string()))
            .or_default()
            .push(update.analysis.productivity_score);
    }

    Ok(buckets
        .into_iter()
        .map(|((date, department), scores)| TrendBucket {
            date,
            productivity: mean(&scores),
            updates: scores.len(),
            department,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{member, now, upd_scored, FakeSource};

    #[test]
    fn buckets_group_by_day_and_department() {
        let source = FakeSource {
            members: vec![
                member("A - Dev", "Developer", "Development"),
                member("B - PM", "Product Manager", "Product Management"),
            ],
            updates: vec![
                upd_scored("A - Dev", "first", "2026-02-10T09:00:00Z", 0.8),
                upd_scored("A - Dev", "second", "2026-02-10T17:00:00Z", 0.6),
                upd_scored("B - PM", "third", "2026-02-10T12:00:00Z", 0.9),
                upd_scored("A - Dev", "fourth", "2026-02-12T09:00:00Z", 1.0),
            ],
        };
        let got = productivity_trends_at(&source, TimeRange::Month, None, now()).unwrap();
        assert_eq!(got.len(), 3);
        assert_eq!(got[0].date, "2026-02-10");
        assert_eq!(got[0].department, "Development");
        assert!((got[0].productivity - 0.7).abs() < 1e-12);
        assert_eq!(got[0].updates, 2);
        assert_eq!(got[1].department, "Product Management");
        assert_eq!(got[2].date, "2026-02-12");
    }

    #[test]
    fn department_filter_is_exact() {
        let source = FakeSource {
            members: vec![
                member("A - Dev", "Developer", "Development"),
                member("B - PM", "Product Manager", "Product Management"),
            ],
            updates: vec![
                upd_scored("A - Dev", "dev work", "2026-02-10T09:00:00Z", 0.8),
                upd_scored("B - PM", "pm work", "2026-02-10T12:00:00Z", 0.9),
            ],
        };
        let got =
            productivity_trends_at(&source, TimeRange::Month, Some("Development"), now()).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].department, "Development");
    }

    #[test]
    fn window_bounds_follow_the_range() {
        let source = FakeSource {
            members: vec![member("A - Dev", "Developer", "Development")],
            updates: vec![
                upd_scored("A - Dev", "inside", "2026-02-25T00:00:00Z", 0.8),
                upd_scored("A - Dev", "outside", "2026-01-01T00:00:00Z", 0.8),
            ],
        };
        let got = productivity_trends_at(&source, TimeRange::Week, None, now()).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].date, "2026-02-25");
    }

    #[test]
    fn unknown_range_is_an_invalid_parameter() {
        let err = TimeRange::parse("fortnight").unwrap_err();
        assert_eq!(err.kind(), "invalid_parameter");
        assert_eq!(TimeRange::parse("quarter").unwrap().days(), 90);
    }
}
