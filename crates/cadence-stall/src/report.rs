//! Per-author aggregation: fetch the window, score consecutive pairs,
//! detect stalled periods, assemble the report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use cadence_core::{
    parse_rfc3339, AnalysisError, Update, UpdateSource, UNKNOWN_DEPARTMENT,
};

use crate::detect::{detect_stalls, SimilarityEdge, StalledPeriod};
use crate::score::{CosineScorer, SimilarityScorer};
use crate::tokenize::{normalize, NormalizedDoc};

/// Tuning knobs for one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StallParams {
    /// Window size: updates in `[now - days, now]` are considered.
    pub days: i64,
    /// Similarity cutoff in (0, 1); pairs at or above it count as stalled.
    pub threshold: f64,
    /// Per-author document cap; the most recent updates win.
    pub max_updates_per_author: usize,
}

impl Default for StallParams {
    fn default() -> Self {
        Self {
            days: 60,
            threshold: 0.85,
            max_updates_per_author: 200,
        }
    }
}

impl StallParams {
    /// Reject out-of-domain parameters before any computation runs.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.days <= 0 {
            return Err(AnalysisError::invalid_parameter(format!(
                "days must be positive, got {}",
                self.days
            )));
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(AnalysisError::invalid_parameter(format!(
                "threshold must be inside (0, 1), got {}",
                self.threshold
            )));
        }
        if self.max_updates_per_author == 0 {
            return Err(AnalysisError::invalid_parameter(
                "max_updates_per_author must be positive",
            ));
        }
        Ok(())
    }
}

/// One author's similarity trend and stalled periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorReport {
    pub author: String,
    pub role: String,
    pub department: String,
    /// Mean over scored edges; omitted entirely when every pair was
    /// skipped, never reported as zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_similarity: Option<f64>,
    pub update_count: usize,
    pub trend: Vec<SimilarityEdge>,
    pub stalled_periods: Vec<StalledPeriod>,
    pub truncated: bool,
}

/// Full response for one analysis request. `results` are ordered by
/// author name so identical inputs serialize byte-identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StallReport {
    pub analysis_period: String,
    pub similarity_threshold: f64,
    pub results: Vec<AuthorReport>,
    pub skipped_pairs: usize,
}

/// Analyze the window ending now, with the default cosine metric.
pub fn analyze_stalling(
    source: &dyn UpdateSource,
    params: &StallParams,
) -> Result<StallReport, AnalysisError> {
    analyze_stalling_at(source, params, OffsetDateTime::now_utc())
}

/// Analyze the window ending at an explicit instant. Pinning the clock
/// keeps repeated runs reproducible.
pub fn analyze_stalling_at(
    source: &dyn UpdateSource,
    params: &StallParams,
    now: OffsetDateTime,
) -> Result<StallReport, AnalysisError> {
    analyze_stalling_with(source, params, now, &CosineScorer)
}

/// Full-control variant with a caller-chosen similarity metric.
pub fn analyze_stalling_with(
    source: &dyn UpdateSource,
    params: &StallParams,
    now: OffsetDateTime,
    scorer: &dyn SimilarityScorer,
) -> Result<StallReport, AnalysisError> {
    params.validate()?;
    let since = now - Duration::days(params.days);
    let updates = source
        .fetch_updates(None, since, now)
        .map_err(|e| AnalysisError::data_unavailable(e.to_string()))?;
    let roster = source
        .members()
        .map_err(|e| AnalysisError::data_unavailable(e.to_string()))?;

    let mut by_author: BTreeMap<String, Vec<Update>> = BTreeMap::new();
    for update in updates {
        by_author.entry(update.author.clone()).or_default().push(update);
    }

    let mut skipped_pairs = 0;
    let mut results = Vec::new();
    for (author, mine) in by_author {
        // Sort defensively on the parsed timestamp; the source contract
        // asks for ascending order but does not always deliver it.
        let mut keyed = Vec::with_capacity(mine.len());
        for update in mine {
            let ts = parse_rfc3339(&update.ts)
                .map_err(|e| AnalysisError::data_unavailable(format!("update {}: {e}", update.id)))?;
            keyed.push((ts, update));
        }
        keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));

        if keyed.len() < 2 {
            continue;
        }

        let mut truncated = false;
        if keyed.len() > params.max_updates_per_author {
            let excess = keyed.len() - params.max_updates_per_author;
            keyed.drain(..excess);
            truncated = true;
        }
        let update_count = keyed.len();

        // Normalize each update once; a failure poisons the pairs on
        // both sides of that update but never the batch.
        let docs: Vec<Option<NormalizedDoc>> = keyed
            .iter()
            .map(|(_, u)| match normalize(&u.text) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    tracing::warn!(
                        author = %author,
                        update = %u.id,
                        error = %e,
                        "skipping unnormalizable update text"
                    );
                    None
                }
            })
            .collect();

        let mut trend = Vec::new();
        for i in 0..keyed.len() - 1 {
            let (Some(doc_a), Some(doc_b)) = (&docs[i], &docs[i + 1]) else {
                skipped_pairs += 1;
                continue;
            };
            trend.push(SimilarityEdge {
                author: author.clone(),
                update_a_id: keyed[i].1.id.clone(),
                update_b_id: keyed[i + 1].1.id.clone(),
                date_a: keyed[i].1.ts.clone(),
                date_b: keyed[i + 1].1.ts.clone(),
                score: scorer.score(doc_a, doc_b),
            });
        }

        let average_similarity = if trend.is_empty() {
            None
        } else {
            Some(trend.iter().map(|e| e.score).sum::<f64>() / trend.len() as f64)
        };
        let stalled_periods = detect_stalls(&trend, params.threshold);

        let (role, department) = roster
            .iter()
            .find(|m| m.name == author)
            .map(|m| (m.role.clone(), m.department.clone()))
            .unwrap_or_else(|| ("Unknown".to_string(), UNKNOWN_DEPARTMENT.to_string()));

        results.push(AuthorReport {
            author,
            role,
            department,
            average_similarity,
            update_count,
            trend,
            stalled_periods,
            truncated,
        });
    }

    Ok(StallReport {
        analysis_period: format!("Last {} days", params.days),
        similarity_threshold: params.threshold,
        results,
        skipped_pairs,
    })
}
