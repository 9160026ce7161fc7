//! Submission history, newest first.

use time::OffsetDateTime;

use cadence_core::{AnalysisError, Update, UpdateSource};

use crate::rollup::{all_updates, parsed_ts};

/// Every stored update, newest first, optionally capped at `limit`.
pub fn update_history(
    source: &dyn UpdateSource,
    limit: Option<usize>,
) -> Result<Vec<Update>, AnalysisError> {
    update_history_at(source, limit, OffsetDateTime::now_utc())
}

pub fn update_history_at(
    source: &dyn UpdateSource,
    limit: Option<usize>,
    now: OffsetDateTime,
) -> Result<Vec<Update>, AnalysisError> {
    let updates = all_updates(source, now)?;
    let mut keyed = updates
        .into_iter()
        .map(|u| Ok((parsed_ts(&u)?, u)))
        .collect::<Result<Vec<_>, AnalysisError>>()?;
    keyed.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.id.cmp(&a.1.id)));
    let mut out: Vec<Update> = keyed.into_iter().map(|(_, u)| u).collect();
    if let Some(limit) = limit {
        out.truncate(limit);
    }
    Ok(out)
}
