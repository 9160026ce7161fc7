//! Delivery velocity: planned vs completed items per ISO week per
//! department.

use serde::Serialize;
use std::collections::BTreeMap;
use time::OffsetDateTime;

use cadence_core::{AnalysisError, Update, UpdateSource};

use crate::rollup::{all_updates, department_of, parsed_ts, roster};

/// One (week, department) velocity cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VelocityBucket {
    /// ISO week label, `YYYY-Www`.
    pub sprint: String,
    pub department: String,
    /// Items in `next_week_plans` across the week's updates.
    pub planned: usize,
    /// Items in `completed_tasks` across the week's updates.
    pub completed: usize,
    pub update_count: usize,
}

/// ISO week label for an update's timestamp. Weeks run Monday to Sunday
/// and the year is the ISO week-based year, so late-December days can
/// land in week 01 of the next year.
fn sprint_label(update: &Update) -> Result<String, AnalysisError> {
    let ts = parsed_ts(update)?;
    let (year, week, _) = ts.date().to_iso_week_date();
    Ok(format!("{year}-W{week:02}"))
}

/// Velocity cells over the full history, newest sprint first.
/// `department` of `None` means all.
pub fn team_velocity(
    source: &dyn UpdateSource,
    department: Option<&str>,
) -> Result<Vec<VelocityBucket>, AnalysisError> {
    team_velocity_at(source, department, OffsetDateTime::now_utc())
}

pub fn team_velocity_at(
    source: &dyn UpdateSource,
    department: Option<&str>,
    now: OffsetDateTime,
) -> Result<Vec<VelocityBucket>, AnalysisError> {
    let updates = all_updates(source, now)?;
    let members = roster(source)?;

    let mut cells: BTreeMap<(String, String), VelocityBucket> = BTreeMap::new();
    for update in &updates {
        let dept = department_of(&members, &update.author);
        if department.is_some_and(|d| d != dept) {
            continue;
        }
        let sprint = sprint_label(update)?;
        let cell = cells
            .entry((sprint.clone(), dept.to_string()))
            .or_insert_with(|| VelocityBucket {
                sprint,
                department: dept.to_string(),
                planned: 0,
                completed: 0,
                update_count: 0,
            });
        cell.update_count += 1;
        cell.planned += update.analysis.next_week_plans.len();
        cell.completed += update.analysis.completed_tasks.len();
    }

    let mut out: Vec<VelocityBucket> = cells.into_values().collect();
    out.sort_by(|a, b| b.sprint.cmp(&a.sprint).then(a.department.cmp(&b.department)));
    Ok(out)
}
