//! Per-member performance metrics and tiered ratings.
//!
//! Metrics come from three places: the extracted field lists (tasks,
//! goals, projects, blockers), the raw update text (keyword counting),
//! and the submission timestamps (frequency and consistency).

use serde::Serialize;
use time::OffsetDateTime;

use cadence_core::{AnalysisError, Update, UpdateSource};

use crate::rollup::{mean, parsed_ts, roster};

const COMPLEXITY_HEAVY: &[&str] = &["architecture", "design", "implement", "optimize"];
const COMPLEXITY_HARD: &[&str] = &["complex", "challenging", "difficult"];
const GOAL_DONE_TERMS: &[&str] = &["complete", "achieved"];
const MILESTONE_TERMS: &[&str] = &["milestone", "major", "key", "critical"];
const IMPACT_CORE_TERMS: &[&str] = &["critical", "key", "major", "strategic"];
const IMPACT_BUSINESS_TERMS: &[&str] = &["customer", "revenue", "cost-saving"];
const COLLABORATION_TERMS: &[&str] = &["collaborated", "worked with", "helped", "supported", "paired"];
const KNOWLEDGE_TERMS: &[&str] = &["documented", "trained", "presented", "shared", "mentored"];
const TEAM_HELP_TERMS: &[&str] = &["helped team", "supported colleague", "assisted", "mentored"];
const INNOVATION_TERMS: &[&str] = &["new solution", "innovative", "improved", "optimized", "automated"];
const QUALITY_ISSUE_TERMS: &[&str] = &["bug", "issue", "error"];
const RESOLUTION_TERMS: &[&str] = &["resolved", "fixed", "solved", "addressed"];

/// Accepted rating windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingsPeriod {
    Days30,
    Days90,
    Days180,
    Days365,
}

impl RatingsPeriod {
    pub fn parse(s: &str) -> Result<Self, AnalysisError> {
        match s {
            "30d" => Ok(RatingsPeriod::Days30),
            "90d" => Ok(RatingsPeriod::Days90),
            "180d" => Ok(RatingsPeriod::Days180),
            "365d" => Ok(RatingsPeriod::Days365),
            other => Err(AnalysisError::invalid_parameter(format!(
                "invalid period {other:?} (expected 30d, 90d, 180d, or 365d)"
            ))),
        }
    }

    pub fn days(self) -> i64 {
        match self {
            RatingsPeriod::Days30 => 30,
            RatingsPeriod::Days90 => 90,
            RatingsPeriod::Days180 => 180,
            RatingsPeriod::Days365 => 365,
        }
    }
}

/// One member's metric sheet for a window. All scores are in [0,1]
/// except `update_frequency` (updates per week) and `avg_task_complexity`
/// (1.0 baseline plus term bonuses).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub productivity_score: f64,
    pub completed_tasks_count: usize,
    pub goals_achieved: usize,
    pub project_completion_rate: f64,
    pub update_frequency: f64,
    pub collaboration_score: f64,
    pub impact_score: f64,
    pub consistency_score: f64,
    pub innovation_score: f64,
    pub quality_score: f64,
    pub blockers_resolved: usize,
    pub avg_task_complexity: f64,
    pub milestone_completion_rate: f64,
    pub knowledge_sharing: usize,
    pub team_contributions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeePerformance {
    pub name: String,
    pub role: String,
    pub department: String,
    pub metrics: PerformanceMetrics,
    /// 1-based rank across all rated members.
    pub ranking: usize,
    pub performance_tier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub top_performers: Vec<EmployeePerformance>,
    pub strong_performers: Vec<EmployeePerformance>,
    pub other_performers: Vec<EmployeePerformance>,
    pub total_employees: usize,
    pub evaluation_period: String,
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(t))
}

fn count_present(text: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|t| text.contains(**t)).count()
}

/// Percent-complete reading of a project line: every digit in the line
/// concatenated and parsed as one number, kept only when it lands in
/// 0..=100. A line naming two numbers ("API v2 at 60%") therefore does
/// not parse, matching how these lines have always been read.
fn percent_complete(project: &str) -> Option<f64> {
    let digits: String = project.chars().filter(|c| c.is_ascii_digit()).collect();
    let rate: u32 = digits.parse().ok()?;
    (rate <= 100).then_some(f64::from(rate))
}

/// Compute the metric sheet for one member's updates over a window of
/// `days_in_period` days.
pub fn calculate_metrics(
    updates: &[Update],
    days_in_period: f64,
) -> Result<PerformanceMetrics, AnalysisError> {
    if updates.is_empty() {
        return Ok(PerformanceMetrics::default());
    }

    let scores: Vec<f64> = updates.iter().map(|u| u.analysis.productivity_score).collect();
    let productivity_score = mean(&scores);

    // Completed tasks, with a complexity estimate per task.
    let mut completed_tasks_count = 0usize;
    let mut total_complexity = 0.0f64;
    for update in updates {
        for task in &update.analysis.completed_tasks {
            let lower = task.to_lowercase();
            let mut complexity = 1.0;
            if contains_any(&lower, COMPLEXITY_HEAVY) {
                complexity += 0.5;
            }
            if contains_any(&lower, COMPLEXITY_HARD) {
                complexity += 0.3;
            }
            if task.split_whitespace().count() > 10 {
                complexity += 0.2;
            }
            total_complexity += complexity;
            completed_tasks_count += 1;
        }
    }
    let avg_task_complexity = if completed_tasks_count > 0 {
        total_complexity / completed_tasks_count as f64
    } else {
        0.0
    };

    // Goals, and the milestone subset of goals.
    let mut goals_achieved = 0usize;
    let mut milestones_total = 0usize;
    let mut milestones_done = 0usize;
    for update in updates {
        for goal in &update.analysis.goals_status {
            let lower = goal.to_lowercase();
            let done = contains_any(&lower, GOAL_DONE_TERMS);
            if done {
                goals_achieved += 1;
            }
            if contains_any(&lower, MILESTONE_TERMS) {
                milestones_total += 1;
                if done {
                    milestones_done += 1;
                }
            }
        }
    }
    let milestone_completion_rate = if milestones_total > 0 {
        milestones_done as f64 / milestones_total as f64
    } else {
        0.0
    };

    // Projects: impact terms plus percent-complete lines.
    let mut impact_score = 0.0f64;
    let mut completion_rates: Vec<f64> = Vec::new();
    for update in updates {
        for project in &update.analysis.project_progress {
            let lower = project.to_lowercase();
            if contains_any(&lower, IMPACT_CORE_TERMS) {
                impact_score += 0.3;
            }
            if contains_any(&lower, IMPACT_BUSINESS_TERMS) {
                impact_score += 0.2;
            }
            if project.contains('%') {
                if let Some(rate) = percent_complete(project) {
                    completion_rates.push(rate);
                }
            }
        }
    }
    let impact_score = impact_score.min(1.0);
    let project_completion_rate = if completion_rates.is_empty() {
        0.0
    } else {
        mean(&completion_rates) / 100.0
    };

    let weeks_in_period = (days_in_period / 7.0).max(1.0);
    let update_frequency = updates.len() as f64 / weeks_in_period;

    // Consistency: mean day-gap between consecutive submissions, scaled
    // so a weekly cadence scores 0 and same-day submissions score 1.
    let mut dates: Vec<time::Date> = updates
        .iter()
        .map(|u| Ok(parsed_ts(u)?.date()))
        .collect::<Result<_, AnalysisError>>()?;
    dates.sort();
    let gaps: Vec<f64> = dates
        .windows(2)
        .map(|w| (w[1] - w[0]).whole_days() as f64)
        .collect();
    let mean_gap = if gaps.is_empty() { 0.0 } else { mean(&gaps) / 7.0 };
    let consistency_score = (1.0 - mean_gap).clamp(0.0, 1.0);

    // Text-derived counters. Each term counts at most once per update.
    let mut collaboration_mentions = 0usize;
    let mut knowledge_sharing = 0usize;
    let mut team_contributions = 0usize;
    let mut innovation_updates = 0usize;
    let mut blockers_resolved = 0usize;
    for update in updates {
        let text = update.text.to_lowercase();
        collaboration_mentions += count_present(&text, COLLABORATION_TERMS);
        knowledge_sharing += count_present(&text, KNOWLEDGE_TERMS);
        team_contributions += count_present(&text, TEAM_HELP_TERMS);
        if contains_any(&text, INNOVATION_TERMS) {
            innovation_updates += 1;
        }
        if contains_any(&text, RESOLUTION_TERMS) {
            blockers_resolved += 1;
        }
    }
    let n = updates.len() as f64;
    let collaboration_score = (collaboration_mentions as f64 / (n * 2.0)).min(1.0);
    let innovation_score = (innovation_updates as f64 / n).min(1.0);

    // Quality: blocker lines that read like defects, against delivered
    // task volume.
    let mut quality_issues = 0usize;
    for update in updates {
        for blocker in &update.analysis.blockers {
            if contains_any(&blocker.to_lowercase(), QUALITY_ISSUE_TERMS) {
                quality_issues += 1;
            }
        }
    }
    let quality_score =
        1.0 - (quality_issues as f64 / completed_tasks_count.max(1) as f64).min(1.0);

    Ok(PerformanceMetrics {
        productivity_score,
        completed_tasks_count,
        goals_achieved,
        project_completion_rate,
        update_frequency,
        collaboration_score,
        impact_score,
        consistency_score,
        innovation_score,
        quality_score,
        blockers_resolved,
        avg_task_complexity,
        milestone_completion_rate,
        knowledge_sharing,
        team_contributions,
    })
}

/// Weighted single-number summary of a metric sheet. Count metrics are
/// normalized against fixed caps: 20 tasks, 10 goals, 5 updates a week.
pub fn calculate_overall_score(metrics: &PerformanceMetrics) -> f64 {
    let tasks = (metrics.completed_tasks_count as f64 / 20.0).min(1.0);
    let goals = (metrics.goals_achieved as f64 / 10.0).min(1.0);
    let frequency = (metrics.update_frequency / 5.0).min(1.0);
    0.3 * metrics.productivity_score
        + 0.2 * tasks
        + 0.2 * goals
        + 0.2 * metrics.project_completion_rate
        + 0.1 * frequency
}

pub fn employee_ratings(
    source: &dyn UpdateSource,
    period: RatingsPeriod,
) -> Result<PerformanceReport, AnalysisError> {
    employee_ratings_at(source, period, OffsetDateTime::now_utc())
}

/// Rate every roster member with at least one update in the window and
/// split them into Top 10% / Next 20% / Rest 70% tiers. Each tier keeps
/// at least one member while members remain, so small teams always have
/// a top performer.
pub fn employee_ratings_at(
    source: &dyn UpdateSource,
    period: RatingsPeriod,
    now: OffsetDateTime,
) -> Result<PerformanceReport, AnalysisError> {
    let members = roster(source)?;
    let since = now - time::Duration::days(period.days());

    let mut scored = Vec::new();
    for member in members {
        let updates = source
            .fetch_updates(Some(&member.name), since, now)
            .map_err(|e| AnalysisError::data_unavailable(e.to_string()))?;
        if updates.is_empty() {
            continue;
        }
        let metrics = calculate_metrics(&updates, period.days() as f64)?;
        let overall = calculate_overall_score(&metrics);
        scored.push((member, metrics, overall));
    }
    // Stable sort: ties keep roster order.
    scored.sort_by(|a, b| b.2.total_cmp(&a.2));

    let total_employees = scored.len();
    let top_threshold = ((total_employees as f64 * 0.1) as usize).max(1);
    let strong_threshold = ((total_employees as f64 * 0.3) as usize).max(1);

    let mut report = PerformanceReport {
        top_performers: Vec::new(),
        strong_performers: Vec::new(),
        other_performers: Vec::new(),
        total_employees,
        evaluation_period: format!("Last {} days", period.days()),
    };
    for (rank, (member, metrics, _)) in scored.into_iter().enumerate() {
        let ranking = rank + 1;
        let tier = if ranking <= top_threshold {
            "Top 10%"
        } else if ranking <= strong_threshold {
            "Next 20%"
        } else {
            "Rest 70%"
        };
        let entry = EmployeePerformance {
            name: member.name,
            role: member.role,
            department: member.department,
            metrics,
            ranking,
            performance_tier: tier.to_string(),
        };
        if ranking <= top_threshold {
            report.top_performers.push(entry);
        } else if ranking <= strong_threshold {
            report.strong_performers.push(entry);
        } else {
            report.other_performers.push(entry);
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{member, now, upd_scored, upd_with, FakeSource};
    use cadence_core::ExtractedFields;

    #[test]
    fn no_updates_means_all_zero_metrics() {
        let metrics = calculate_metrics(&[], 30.0).unwrap();
        assert_eq!(metrics, PerformanceMetrics::default());
    }

    #[test]
    fn task_complexity_adds_term_and_length_bonuses() {
        let analysis = ExtractedFields {
            completed_tasks: vec![
                "Implemented the caching layer redesign for the search index rollout this quarter"
                    .to_string(),
                "Quick fix".to_string(),
            ],
            ..Default::default()
        };
        let updates = [upd_with("A - Dev", "week", "2026-02-01T00:00:00Z", analysis)];
        let metrics = calculate_metrics(&updates, 30.0).unwrap();
        assert_eq!(metrics.completed_tasks_count, 2);
        // First task: 1.0 + 0.5 (implement) + 0.2 (long), second: 1.0.
        assert!((metrics.avg_task_complexity - 1.35).abs() < 1e-12);
    }

    #[test]
    fn goals_and_milestones_count_term_matches() {
        let analysis = ExtractedFields {
            goals_status: vec![
                "Completed the major database migration".to_string(),
                "Still working on onboarding docs".to_string(),
                "Critical launch gate slipped".to_string(),
            ],
            ..Default::default()
        };
        let updates = [upd_with("A - Dev", "week", "2026-02-01T00:00:00Z", analysis)];
        let metrics = calculate_metrics(&updates, 30.0).unwrap();
        assert_eq!(metrics.goals_achieved, 1);
        // Two milestone goals, one of them done.
        assert!((metrics.milestone_completion_rate - 0.5).abs() < 1e-12);
    }

    #[test]
    fn percent_lines_parse_by_digit_concatenation() {
        assert_eq!(percent_complete("Migration 45% done"), Some(45.0));
        assert_eq!(percent_complete("Rollout complete 100%"), Some(100.0));
        // Two numbers concatenate past 100 and drop out.
        assert_eq!(percent_complete("API v2 at 60%"), None);
        assert_eq!(percent_complete("no digits here"), None);
    }

    #[test]
    fn completion_rate_averages_parsable_percent_lines() {
        let analysis = ExtractedFields {
            project_progress: vec![
                "Migration 40% done".to_string(),
                "Search rework 60%".to_string(),
                "Design doc in review".to_string(),
            ],
            ..Default::default()
        };
        let updates = [upd_with("A - Dev", "week", "2026-02-01T00:00:00Z", analysis)];
        let metrics = calculate_metrics(&updates, 30.0).unwrap();
        assert!((metrics.project_completion_rate - 0.5).abs() < 1e-12);
    }

    #[test]
    fn impact_score_sums_term_bonuses_capped_at_one() {
        let analysis = ExtractedFields {
            project_progress: vec![
                "Critical customer migration".to_string(),
                "Strategic revenue dashboard".to_string(),
                "Key cost-saving automation".to_string(),
            ],
            ..Default::default()
        };
        let updates = [upd_with("A - Dev", "week", "2026-02-01T00:00:00Z", analysis)];
        let metrics = calculate_metrics(&updates, 30.0).unwrap();
        // 0.5 per line would sum to 1.5; capped.
        assert_eq!(metrics.impact_score, 1.0);
    }

    #[test]
    fn frequency_is_updates_per_week_with_a_one_week_floor() {
        let updates = [
            upd_scored("A - Dev", "one", "2026-02-01T00:00:00Z", 0.5),
            upd_scored("A - Dev", "two", "2026-02-08T00:00:00Z", 0.5),
            upd_scored("A - Dev", "three", "2026-02-15T00:00:00Z", 0.5),
        ];
        let monthly = calculate_metrics(&updates, 30.0).unwrap();
        assert!((monthly.update_frequency - 3.0 / (30.0 / 7.0)).abs() < 1e-12);
        // Short windows divide by one week, not a fraction of one.
        let short = calculate_metrics(&updates, 3.0).unwrap();
        assert!((short.update_frequency - 3.0).abs() < 1e-12);
    }

    #[test]
    fn weekly_cadence_scores_zero_consistency() {
        let updates = [
            upd_scored("A - Dev", "one", "2026-02-01T00:00:00Z", 0.5),
            upd_scored("A - Dev", "two", "2026-02-08T00:00:00Z", 0.5),
            upd_scored("A - Dev", "three", "2026-02-15T00:00:00Z", 0.5),
        ];
        let metrics = calculate_metrics(&updates, 30.0).unwrap();
        assert_eq!(metrics.consistency_score, 0.0);

        let single = [upd_scored("A - Dev", "one", "2026-02-01T00:00:00Z", 0.5)];
        assert_eq!(calculate_metrics(&single, 30.0).unwrap().consistency_score, 1.0);
    }

    #[test]
    fn text_counters_pick_up_keyword_families() {
        let updates = [upd_scored(
            "A - Dev",
            "Worked with the infra team and helped onboard the new hire. \
             Documented the runbook and automated the release. Resolved the flaky CI job.",
            "2026-02-01T00:00:00Z",
            0.8,
        )];
        let metrics = calculate_metrics(&updates, 30.0).unwrap();
        // "worked with" and "helped" both match; two mentions over 1 update.
        assert_eq!(metrics.collaboration_score, 1.0);
        assert_eq!(metrics.knowledge_sharing, 1);
        assert_eq!(metrics.innovation_score, 1.0);
        assert_eq!(metrics.blockers_resolved, 1);
    }

    #[test]
    fn defect_blockers_pull_quality_down() {
        let analysis = ExtractedFields {
            blockers: vec!["login bug in prod".to_string()],
            completed_tasks: vec!["task a".to_string(), "task b".to_string()],
            ..Default::default()
        };
        let updates = [upd_with("A - Dev", "week", "2026-02-01T00:00:00Z", analysis)];
        let metrics = calculate_metrics(&updates, 30.0).unwrap();
        assert!((metrics.quality_score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn overall_score_applies_weights_and_caps() {
        let metrics = PerformanceMetrics {
            productivity_score: 0.5,
            completed_tasks_count: 40,
            goals_achieved: 5,
            project_completion_rate: 0.25,
            update_frequency: 10.0,
            ..Default::default()
        };
        let got = calculate_overall_score(&metrics);
        assert!((got - 0.6).abs() < 1e-12);
    }

    #[test]
    fn ratings_rank_and_tier_with_minimum_one_per_tier() {
        let source = FakeSource {
            members: vec![
                member("Low - Dev", "Dev", "Development"),
                member("High - Dev", "Dev", "Development"),
                member("Mid - Dev", "Dev", "Development"),
                member("Idle - Dev", "Dev", "Development"),
            ],
            updates: vec![
                upd_scored("Low - Dev", "quiet week", "2026-02-20T00:00:00Z", 0.2),
                upd_scored("High - Dev", "big week", "2026-02-20T00:00:00Z", 1.0),
                upd_scored("Mid - Dev", "ok week", "2026-02-20T00:00:00Z", 0.6),
            ],
        };
        let report = employee_ratings_at(&source, RatingsPeriod::Days30, now()).unwrap();

        assert_eq!(report.total_employees, 3);
        assert_eq!(report.evaluation_period, "Last 30 days");
        assert_eq!(report.top_performers.len(), 1);
        assert_eq!(report.top_performers[0].name, "High - Dev");
        assert_eq!(report.top_performers[0].ranking, 1);
        assert_eq!(report.top_performers[0].performance_tier, "Top 10%");
        // With three rated members both thresholds are 1, so the next
        // two land in the bottom tier.
        assert!(report.strong_performers.is_empty());
        assert_eq!(report.other_performers.len(), 2);
        assert_eq!(report.other_performers[0].name, "Mid - Dev");
        assert_eq!(report.other_performers[1].ranking, 3);
        assert_eq!(report.other_performers[1].performance_tier, "Rest 70%");
    }

    #[test]
    fn ratings_window_excludes_stale_updates() {
        let source = FakeSource {
            members: vec![member("A - Dev", "Dev", "Development")],
            updates: vec![upd_scored("A - Dev", "old", "2025-06-01T00:00:00Z", 0.9)],
        };
        let report = employee_ratings_at(&source, RatingsPeriod::Days30, now()).unwrap();
        assert_eq!(report.total_employees, 0);
        assert!(report.top_performers.is_empty());
    }

    #[test]
    fn period_parse_covers_the_four_windows() {
        assert_eq!(RatingsPeriod::parse("365d").unwrap().days(), 365);
        let err = RatingsPeriod::parse("60d").unwrap_err();
        assert_eq!(err.kind(), "invalid_parameter");
    }
}
