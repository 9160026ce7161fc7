//! Team overview: department groupings with per-member rollups, built
//! from the full update history.

use serde::Serialize;
use std::collections::BTreeMap;
use time::OffsetDateTime;

use cadence_core::{AnalysisError, UpdateSource};

use crate::rollup::{all_updates, department_of, mean, roster, top_items};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberOverview {
    pub name: String,
    /// Role half of the `"Full Name - Role"` author string.
    pub role: String,
    pub department: String,
    pub update_count: usize,
    pub average_productivity: f64,
    /// Last three completed tasks, oldest of the three first.
    pub recent_completed: Vec<String>,
    pub current_projects: Vec<String>,
    pub next_week_plans: Vec<String>,
    pub blockers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentOverview {
    pub name: String,
    pub members: Vec<MemberOverview>,
    pub average_productivity: f64,
    pub total_updates: usize,
    /// Three most-reported in-flight projects.
    pub key_projects: Vec<String>,
    pub common_blockers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamOverview {
    pub departments: Vec<DepartmentOverview>,
    pub total_update_count: usize,
    pub team_productivity: f64,
    /// Five most-reported items across every department.
    pub active_projects: Vec<String>,
    pub common_blockers: Vec<String>,
    pub recent_completions: Vec<String>,
}

#[derive(Default)]
struct MemberAccum {
    update_count: usize,
    scores: Vec<f64>,
    completed: Vec<String>,
    projects: Vec<String>,
    plans: Vec<String>,
    blockers: Vec<String>,
}

#[derive(Default)]
struct DeptAccum {
    member_order: Vec<String>,
    members: BTreeMap<String, MemberAccum>,
    scores: Vec<f64>,
    total_updates: usize,
    projects: Vec<String>,
    blockers: Vec<String>,
}

fn role_of(author: &str) -> String {
    author
        .split(" - ")
        .nth(1)
        .unwrap_or("Unknown")
        .to_string()
}

fn last_three(items: &[String]) -> Vec<String> {
    items[items.len().saturating_sub(3)..].to_vec()
}

pub fn team_overview(source: &dyn UpdateSource) -> Result<TeamOverview, AnalysisError> {
    team_overview_at(source, OffsetDateTime::now_utc())
}

/// Departments and members appear in the order they first show up in the
/// update history; members without any update are not listed.
pub fn team_overview_at(
    source: &dyn UpdateSource,
    now: OffsetDateTime,
) -> Result<TeamOverview, AnalysisError> {
    let updates = all_updates(source, now)?;
    let members = roster(source)?;

    let mut dept_order: Vec<String> = Vec::new();
    let mut depts: BTreeMap<String, DeptAccum> = BTreeMap::new();

    for update in &updates {
        let dept_name = department_of(&members, &update.author);
        if !depts.contains_key(dept_name) {
            dept_order.push(dept_name.to_string());
        }
        let dept = depts.entry(dept_name.to_string()).or_default();
        dept.total_updates += 1;
        dept.scores.push(update.analysis.productivity_score);
        dept.projects
            .extend(update.analysis.project_progress.iter().cloned());
        dept.blockers.extend(update.analysis.blockers.iter().cloned());

        if !dept.members.contains_key(&update.author) {
            dept.member_order.push(update.author.clone());
        }
        let member = dept.members.entry(update.author.clone()).or_default();
        member.update_count += 1;
        member.scores.push(update.analysis.productivity_score);
        member
            .completed
            .extend(update.analysis.completed_tasks.iter().cloned());
        member
            .projects
            .extend(update.analysis.project_progress.iter().cloned());
        member
            .plans
            .extend(update.analysis.next_week_plans.iter().cloned());
        member
            .blockers
            .extend(update.analysis.blockers.iter().cloned());
    }

    let mut departments = Vec::with_capacity(dept_order.len());
    let mut all_projects = Vec::new();
    let mut all_blockers = Vec::new();
    let mut all_completed = Vec::new();
    let mut all_scores = Vec::new();
    let mut total_update_count = 0;

    for dept_name in dept_order {
        let dept = &depts[&dept_name];
        let members = dept
            .member_order
            .iter()
            .map(|name| {
                let m = &dept.members[name];
                MemberOverview {
                    name: name.clone(),
                    role: role_of(name),
                    department: dept_name.clone(),
                    update_count: m.update_count,
                    average_productivity: mean(&m.scores),
                    recent_completed: last_three(&m.completed),
                    current_projects: last_three(&m.projects),
                    next_week_plans: last_three(&m.plans),
                    blockers: last_three(&m.blockers),
                }
            })
            .collect();

        all_projects.extend(dept.projects.iter().cloned());
        all_blockers.extend(dept.blockers.iter().cloned());
        for m in dept.members.values() {
            all_completed.extend(m.completed.iter().cloned());
        }
        all_scores.extend(dept.scores.iter().copied());
        total_update_count += dept.total_updates;

        departments.push(DepartmentOverview {
            name: dept_name.clone(),
            members,
            average_productivity: mean(&dept.scores),
            total_updates: dept.total_updates,
            key_projects: top_items(&dept.projects, 3),
            common_blockers: top_items(&dept.blockers, 3),
        });
    }

    Ok(TeamOverview {
        departments,
        total_update_count,
        team_productivity: mean(&all_scores),
        active_projects: top_items(&all_projects, 5),
        common_blockers: top_items(&all_blockers, 5),
        recent_completions: top_items(&all_completed, 5),
    })
}
