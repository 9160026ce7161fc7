//! Data responders: each one answers a [`QueryKind`](crate::QueryKind)
//! by reading the store and shaping a small serializable payload.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use cadence_core::{parse_rfc3339, AnalysisError, Update, UpdateSource};

/// A roster member with no update since the cutoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingMember {
    pub name: String,
    pub department: String,
    /// `YYYY-MM-DD` of the member's most recent update, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
}

/// One day of one department's average productivity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayScore {
    pub date: String,
    pub score: f64,
}

/// One update's worth of open blockers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockerItem {
    pub department: String,
    pub employee: String,
    pub blockers: Vec<String>,
    pub date: String,
}

/// Engagement rollup for one department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementRow {
    pub department: String,
    pub update_count: usize,
    pub active_members: usize,
    /// Updates per active member in the window.
    pub engagement_score: f64,
}

fn fetch_window(
    source: &dyn UpdateSource,
    days: i64,
    now: OffsetDateTime,
) -> Result<Vec<Update>, AnalysisError> {
    source
        .fetch_updates(None, now - Duration::days(days), now)
        .map_err(|e| AnalysisError::data_unavailable(e.to_string()))
}

fn department_of(roster: &[cadence_core::Member], author: &str) -> String {
    roster
        .iter()
        .find(|m| m.name == author)
        .map(|m| m.department.clone())
        .unwrap_or_else(|| cadence_core::UNKNOWN_DEPARTMENT.to_string())
}

fn day_of(ts: &str) -> String {
    ts.split('T').next().unwrap_or(ts).to_string()
}

/// Roster members without an update in the last `days` days, with the
/// date of their most recent update ever, roster order.
pub fn missing_updates(
    source: &dyn UpdateSource,
    days: i64,
    now: OffsetDateTime,
) -> Result<Vec<MissingMember>, AnalysisError> {
    let roster = source
        .members()
        .map_err(|e| AnalysisError::data_unavailable(e.to_string()))?;
    let recent = fetch_window(source, days, now)?;
    let all = source
        .fetch_updates(None, OffsetDateTime::UNIX_EPOCH, now)
        .map_err(|e| AnalysisError::data_unavailable(e.to_string()))?;

    let mut out = Vec::new();
    for member in roster {
        if recent.iter().any(|u| u.author == member.name) {
            continue;
        }
        let last_update = all
            .iter()
            .filter(|u| u.author == member.name)
            .last()
            .map(|u| day_of(&u.ts));
        out.push(MissingMember {
            name: member.name,
            department: member.department,
            last_update,
        });
    }
    Ok(out)
}

/// Per-department daily productivity averages over the window, days
/// ascending within each department.
pub fn productivity_by_department(
    source: &dyn UpdateSource,
    days: i64,
    now: OffsetDateTime,
) -> Result<BTreeMap<String, Vec<DayScore>>, AnalysisError> {
    let roster = source
        .members()
        .map_err(|e| AnalysisError::data_unavailable(e.to_string()))?;
    let updates = fetch_window(source, days, now)?;

    let mut buckets: BTreeMap<(String, String), Vec<f64>> = BTreeMap::new();
    for update in &updates {
        let dept = department_of(&roster, &update.author);
        buckets
            .entry((dept, day_of(&update.ts)))
            .or_default()
            .push(update.analysis.productivity_score);
    }

    let mut out: BTreeMap<String, Vec<DayScore>> = BTreeMap::new();
    for ((dept, date), scores) in buckets {
        let score = scores.iter().sum::<f64>() / scores.len() as f64;
        out.entry(dept).or_default().push(DayScore { date, score });
    }
    Ok(out)
}

/// The most recent updates that reported blockers, newest first,
/// capped at `limit`.
pub fn current_blockers(
    source: &dyn UpdateSource,
    limit: usize,
    now: OffsetDateTime,
) -> Result<Vec<BlockerItem>, AnalysisError> {
    let roster = source
        .members()
        .map_err(|e| AnalysisError::data_unavailable(e.to_string()))?;
    let updates = source
        .fetch_updates(None, OffsetDateTime::UNIX_EPOCH, now)
        .map_err(|e| AnalysisError::data_unavailable(e.to_string()))?;

    let mut keyed = Vec::new();
    for update in updates {
        if update.analysis.blockers.is_empty() {
            continue;
        }
        let ts = parse_rfc3339(&update.ts)
            .map_err(|e| AnalysisError::data_unavailable(format!("update {}: {e}", update.id)))?;
        keyed.push((ts, update));
    }
    keyed.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.id.cmp(&a.1.id)));

    Ok(keyed
        .into_iter()
        .take(limit)
        .map(|(_, u)| BlockerItem {
            department: department_of(&roster, &u.author),
            employee: u.author,
            blockers: u.analysis.blockers,
            date: day_of(&u.ts),
        })
        .collect())
}

/// Update volume and active-member counts per department over the
/// window, highest engagement score first.
pub fn team_engagement(
    source: &dyn UpdateSource,
    days: i64,
    now: OffsetDateTime,
) -> Result<Vec<EngagementRow>, AnalysisError> {
    let roster = source
        .members()
        .map_err(|e| AnalysisError::data_unavailable(e.to_string()))?;
    let updates = fetch_window(source, days, now)?;

    let mut counts: BTreeMap<String, (usize, std::collections::BTreeSet<String>)> =
        BTreeMap::new();
    for update in &updates {
        let dept = department_of(&roster, &update.author);
        let entry = counts.entry(dept).or_default();
        entry.0 += 1;
        entry.1.insert(update.author.clone());
    }

    let mut rows: Vec<EngagementRow> = counts
        .into_iter()
        .map(|(department, (update_count, authors))| {
            let active_members = authors.len();
            EngagementRow {
                department,
                update_count,
                active_members,
                engagement_score: if active_members > 0 {
                    update_count as f64 / active_members as f64
                } else {
                    0.0
                },
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.engagement_score
            .total_cmp(&a.engagement_score)
            .then_with(|| a.department.cmp(&b.department))
    });
    Ok(rows)
}
