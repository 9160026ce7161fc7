//! Per-department rollups over the full update history.

use serde::Serialize;
use std::collections::BTreeMap;
use time::OffsetDateTime;

use cadence_core::{AnalysisError, UpdateSource};

use crate::rollup::{all_updates, dedup_preserving, department_of, mean, roster};

/// All-time aggregate for one department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentMetrics {
    pub name: String,
    /// Mean productivity score over the department's updates.
    pub productivity: f64,
    pub updates: usize,
    /// Total blocker items reported, not distinct blockers.
    pub blockers: usize,
    #[serde(rename = "completedTasks")]
    pub completed_tasks: usize,
}

#[derive(Default)]
struct DeptAccum {
    scores: Vec<f64>,
    updates: usize,
    blockers: usize,
    completed: usize,
}

/// One row per department, ordered by first appearance in the update
/// history.
pub fn department_metrics(
    source: &dyn UpdateSource,
) -> Result<Vec<DepartmentMetrics>, AnalysisError> {
    department_metrics_at(source, OffsetDateTime::now_utc())
}

pub fn department_metrics_at(
    source: &dyn UpdateSource,
    now: OffsetDateTime,
) -> Result<Vec<DepartmentMetrics>, AnalysisError> {
    let updates = all_updates(source, now)?;
    let members = roster(source)?;

    let mut order: Vec<String> = Vec::new();
    let mut accum: BTreeMap<String, DeptAccum> = BTreeMap::new();
    for update in &updates {
        let dept = department_of(&members, &update.author);
        if !accum.contains_key(dept) {
            order.push(dept.to_string());
        }
        let entry = accum.entry(dept.to_string()).or_default();
        entry.updates += 1;
        entry.scores.push(update.analysis.productivity_score);
        entry.blockers += update.analysis.blockers.len();
        entry.completed += update.analysis.completed_tasks.len();
    }

    Ok(order
        .into_iter()
        .map(|name| {
            let a = &accum[&name];
            DepartmentMetrics {
                name,
                productivity: mean(&a.scores),
                updates: a.updates,
                blockers: a.blockers,
                completed_tasks: a.completed,
            }
        })
        .collect())
}

/// Distinct non-empty departments, in roster order.
pub fn department_list(source: &dyn UpdateSource) -> Result<Vec<String>, AnalysisError> {
    let members = roster(source)?;
    Ok(dedup_preserving(
        members
            .into_iter()
            .map(|m| m.department)
            .filter(|d| !d.is_empty())
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{member, now, upd_scored, upd_with, FakeSource};
    use cadence_core::ExtractedFields;

    fn counted(completed: usize, blockers: usize, score: f64) -> ExtractedFields {
        ExtractedFields {
            completed_tasks: (0..completed).map(|i| format!("task {i}")).collect(),
            blockers: (0..blockers).map(|i| format!("blocker {i}")).collect(),
            productivity_score: score,
            ..Default::default()
        }
    }

    #[test]
    fn rows_follow_first_appearance_and_count_items() {
        let source = FakeSource {
            members: vec![
                member("A - Dev", "Developer", "Development"),
                member("B - PM", "Product Manager", "Product Management"),
            ],
            updates: vec![
                upd_with("B - PM", "pm week", "2026-02-01T00:00:00Z", counted(2, 1, 0.9)),
                upd_with("A - Dev", "dev week", "2026-02-02T00:00:00Z", counted(3, 0, 0.7)),
                upd_with("A - Dev", "dev again", "2026-02-09T00:00:00Z", counted(1, 2, 0.9)),
            ],
        };
        let got = department_metrics_at(&source, now()).unwrap();
        assert_eq!(got.len(), 2);

        assert_eq!(got[0].name, "Product Management");
        assert_eq!(got[0].updates, 1);
        assert_eq!(got[0].completed_tasks, 2);
        assert_eq!(got[0].blockers, 1);

        assert_eq!(got[1].name, "Development");
        assert_eq!(got[1].updates, 2);
        assert_eq!(got[1].completed_tasks, 4);
        assert_eq!(got[1].blockers, 2);
        assert!((got[1].productivity - 0.8).abs() < 1e-12);
    }

    #[test]
    fn unrostered_author_lands_in_unknown() {
        let source = FakeSource {
            members: vec![],
            updates: vec![upd_scored("Ghost - Dev", "spooky", "2026-02-01T00:00:00Z", 0.5)],
        };
        let got = department_metrics_at(&source, now()).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].name, "Unknown");
    }

    #[test]
    fn empty_history_yields_no_rows() {
        let source = FakeSource {
            members: vec![member("A - Dev", "Developer", "Development")],
            updates: vec![],
        };
        assert!(department_metrics_at(&source, now()).unwrap().is_empty());
    }

    #[test]
    fn completed_tasks_serializes_camel_case() {
        let row = DepartmentMetrics {
            name: "Development".to_string(),
            productivity: 0.8,
            updates: 2,
            blockers: 1,
            completed_tasks: 4,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"completedTasks\":4"));
        assert!(!json.contains("completed_tasks"));
    }

    #[test]
    fn list_is_distinct_in_roster_order() {
        let source = FakeSource {
            members: vec![
                member("A - Dev", "Developer", "Development"),
                member("B - PM", "Product Manager", "Product Management"),
                member("C - Dev", "Developer", "Development"),
                member("D - ?", "?", ""),
            ],
            updates: vec![],
        };
        let got = department_list(&source).unwrap();
        assert_eq!(got, ["Development", "Product Management"]);
    }
}
