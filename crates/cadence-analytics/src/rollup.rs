//! Shared rollup plumbing: window fetches, means, frequency counting.

use std::collections::BTreeMap;

use time::OffsetDateTime;

use cadence_core::{parse_rfc3339, AnalysisError, Member, Update, UpdateSource};

/// Fetch every stored update up to `now`.
pub(crate) fn all_updates(
    source: &dyn UpdateSource,
    now: OffsetDateTime,
) -> Result<Vec<Update>, AnalysisError> {
    source
        .fetch_updates(None, OffsetDateTime::UNIX_EPOCH, now)
        .map_err(|e| AnalysisError::data_unavailable(e.to_string()))
}

/// Fetch updates in `[now - days, now]`.
pub(crate) fn updates_in_window(
    source: &dyn UpdateSource,
    days: i64,
    now: OffsetDateTime,
) -> Result<Vec<Update>, AnalysisError> {
    source
        .fetch_updates(None, now - time::Duration::days(days), now)
        .map_err(|e| AnalysisError::data_unavailable(e.to_string()))
}

pub(crate) fn roster(source: &dyn UpdateSource) -> Result<Vec<Member>, AnalysisError> {
    source
        .members()
        .map_err(|e| AnalysisError::data_unavailable(e.to_string()))
}

/// Department for an update's author, from the roster; "Unknown" for
/// authors that never made it onto the roster.
pub(crate) fn department_of<'a>(roster: &'a [Member], author: &str) -> &'a str {
    roster
        .iter()
        .find(|m| m.name == author)
        .map(|m| m.department.as_str())
        .unwrap_or(cadence_core::UNKNOWN_DEPARTMENT)
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Calendar day of an update's timestamp, as `YYYY-MM-DD`.
pub(crate) fn day_key(update: &Update) -> Result<String, AnalysisError> {
    let ts = parse_rfc3339(&update.ts)
        .map_err(|e| AnalysisError::data_unavailable(format!("update {}: {e}", update.id)))?;
    let date = ts.date();
    Ok(format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    ))
}

pub(crate) fn parsed_ts(update: &Update) -> Result<OffsetDateTime, AnalysisError> {
    parse_rfc3339(&update.ts)
        .map_err(|e| AnalysisError::data_unavailable(format!("update {}: {e}", update.id)))
}

/// The `n` most frequent items; ties resolve in first-appearance order.
pub(crate) fn top_items(items: &[String], n: usize) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for item in items {
        let entry = counts.entry(item.as_str()).or_insert(0);
        if *entry == 0 {
            first_seen.push(item.as_str());
        }
        *entry += 1;
    }
    let mut ranked: Vec<(usize, &str)> = first_seen
        .iter()
        .enumerate()
        .map(|(order, item)| (order, *item))
        .collect();
    ranked.sort_by(|a, b| counts[b.1].cmp(&counts[a.1]).then(a.0.cmp(&b.0)));
    ranked.into_iter().take(n).map(|(_, item)| item.to_string()).collect()
}

/// Deduplicate preserving first appearance.
pub(crate) fn dedup_preserving(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    items.into_iter().filter(|i| seen.insert(i.clone())).collect()
}
