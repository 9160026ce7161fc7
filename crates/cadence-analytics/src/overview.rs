//! Windowed whole-team snapshot: productivity, activity lists, and
//! per-department counters.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use time::OffsetDateTime;

use cadence_core::{AnalysisError, UpdateSource};

use crate::rollup::{dedup_preserving, department_of, mean, roster, updates_in_window};

/// Accepted overview windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewPeriod {
    Days7,
    Days30,
    Days90,
    Days180,
}

impl OverviewPeriod {
    pub fn parse(s: &str) -> Result<Self, AnalysisError> {
        match s {
            "7d" => Ok(OverviewPeriod::Days7),
            "30d" => Ok(OverviewPeriod::Days30),
            "90d" => Ok(OverviewPeriod::Days90),
            "180d" => Ok(OverviewPeriod::Days180),
            other => Err(AnalysisError::invalid_parameter(format!(
                "invalid period {other:?} (expected 7d, 30d, 90d, or 180d)"
            ))),
        }
    }

    pub fn days(self) -> i64 {
        match self {
            OverviewPeriod::Days7 => 7,
            OverviewPeriod::Days30 => 30,
            OverviewPeriod::Days90 => 90,
            OverviewPeriod::Days180 => 180,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentStat {
    pub productivity: f64,
    pub updates: usize,
    /// Distinct authors who submitted within the window.
    pub active_members: usize,
}

/// The whole-team snapshot for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsOverview {
    pub team_productivity: f64,
    pub total_updates: usize,
    pub active_projects: Vec<String>,
    pub completed_tasks: Vec<String>,
    pub common_blockers: Vec<String>,
    pub department_stats: BTreeMap<String, DepartmentStat>,
}

impl AnalyticsOverview {
    fn empty() -> Self {
        Self {
            team_productivity: 0.0,
            total_updates: 0,
            active_projects: Vec::new(),
            completed_tasks: Vec::new(),
            common_blockers: Vec::new(),
            department_stats: BTreeMap::new(),
        }
    }
}

pub fn analytics_overview(
    source: &dyn UpdateSource,
    period: OverviewPeriod,
) -> Result<AnalyticsOverview, AnalysisError> {
    analytics_overview_at(source, period, OffsetDateTime::now_utc())
}

pub fn analytics_overview_at(
    source: &dyn UpdateSource,
    period: OverviewPeriod,
    now: OffsetDateTime,
) -> Result<AnalyticsOverview, AnalysisError> {
    let updates = updates_in_window(source, period.days(), now)?;
    if updates.is_empty() {
        return Ok(AnalyticsOverview::empty());
    }
    let members = roster(source)?;

    let mut scores = Vec::with_capacity(updates.len());
    let mut projects = Vec::new();
    let mut completed = Vec::new();
    let mut blockers = Vec::new();
    let mut dept_scores: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    let mut dept_updates: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dept_authors: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for update in &updates {
        scores.push(update.analysis.productivity_score);
        projects.extend(update.analysis.project_progress.iter().cloned());
        completed.extend(update.analysis.completed_tasks.iter().cloned());
        blockers.extend(update.analysis.blockers.iter().cloned());

        let dept = department_of(&members, &update.author);
        dept_scores
            .entry(dept)
            .or_default()
            .push(update.analysis.productivity_score);
        *dept_updates.entry(dept).or_insert(0) += 1;
        dept_authors
            .entry(dept)
            .or_default()
            .insert(update.author.as_str());
    }

    let department_stats = dept_updates
        .iter()
        .map(|(dept, count)| {
            (
                dept.to_string(),
                DepartmentStat {
                    productivity: mean(&dept_scores[dept]),
                    updates: *count,
                    active_members: dept_authors[dept].len(),
                },
            )
        })
        .collect();

    Ok(AnalyticsOverview {
        team_productivity: mean(&scores),
        total_updates: updates.len(),
        active_projects: dedup_preserving(projects),
        completed_tasks: dedup_preserving(completed),
        common_blockers: dedup_preserving(blockers),
        department_stats,
    })
}
