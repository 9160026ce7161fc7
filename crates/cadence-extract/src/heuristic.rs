//! Deterministic offline extraction.
//!
//! Splits the update into sentences and files each one under the first
//! matching field family. Nowhere near the quality of the chat
//! extractor, but it needs no network and always returns the same
//! analysis for the same text.

use cadence_core::ExtractedFields;

use crate::{ExtractError, FieldExtractor};

const BLOCKER_TERMS: &[&str] = &[
    "blocked", "blocker", "waiting", "stuck", "pending", "impediment", "dependency",
];

const PLAN_TERMS: &[&str] = &[
    "next week", "will ", "plan to", "planning to", "going to", "scheduled to",
];

const COMPLETED_TERMS: &[&str] = &[
    "completed", "finished", "shipped", "delivered", "implemented", "fixed", "resolved",
    "launched", "merged", "deployed", "automated", "reduced", "conducted", "documented",
    "set up",
];

const GOAL_TERMS: &[&str] = &["goal", "objective", "okr", "milestone"];

const PROGRESS_TERMS: &[&str] = &[
    "% complete", "in progress", "ongoing", "underway", "on track", "started", "continuing",
];

fn matches_any(sentence: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| sentence.contains(t))
}

/// Offline [`FieldExtractor`]. Stateless and infallible.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicExtractor;

impl HeuristicExtractor {
    /// Classify synchronously. The trait impl wraps this; keeping the
    /// body sync makes it trivial to test.
    pub fn classify(&self, text: &str) -> ExtractedFields {
        let mut fields = ExtractedFields::default();
        let mut sentences = 0;
        for raw in text.split(['.', '!', '?', ';', '\n']) {
            let sentence = raw.trim();
            if sentence.is_empty() {
                continue;
            }
            sentences += 1;
            let lower = sentence.to_lowercase();
            // first family wins: a sentence about waiting on review is a
            // blocker even when it mentions a completed deliverable
            if matches_any(&lower, BLOCKER_TERMS) {
                fields.blockers.push(sentence.to_string());
            } else if matches_any(&lower, PLAN_TERMS) {
                fields.next_week_plans.push(sentence.to_string());
            } else if matches_any(&lower, COMPLETED_TERMS) {
                fields.completed_tasks.push(sentence.to_string());
            } else if matches_any(&lower, GOAL_TERMS) {
                fields.goals_status.push(sentence.to_string());
            } else if matches_any(&lower, PROGRESS_TERMS) {
                fields.project_progress.push(sentence.to_string());
            }
        }
        if sentences == 0 {
            return fields;
        }
        fields.productivity_score = (0.5 + 0.1 * fields.completed_tasks.len() as f64
            - 0.05 * fields.blockers.len() as f64)
            .clamp(0.1, 0.95);
        fields
    }
}

#[async_trait::async_trait]
impl FieldExtractor for HeuristicExtractor {
    async fn extract(&self, text: &str) -> Result<ExtractedFields, ExtractError> {
        Ok(self.classify(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Completed user research with 50 participants. \
                          Payment gateway PRD is 80% complete. \
                          Waiting for legal review on requirements. \
                          Next week plan to finalize the PRD.";

    #[test]
    fn files_sentences_under_the_right_family() {
        let fields = HeuristicExtractor.classify(SAMPLE);
        assert_eq!(fields.completed_tasks.len(), 1);
        assert!(fields.completed_tasks[0].starts_with("Completed user research"));
        assert_eq!(fields.project_progress.len(), 1);
        assert_eq!(fields.blockers.len(), 1);
        assert_eq!(fields.next_week_plans.len(), 1);
    }

    #[test]
    fn blockers_win_over_completion_wording() {
        let fields = HeuristicExtractor.classify("Implemented the exporter but blocked on review");
        assert_eq!(fields.blockers.len(), 1);
        assert!(fields.completed_tasks.is_empty());
    }

    #[test]
    fn score_reflects_completions_and_blockers() {
        let productive = HeuristicExtractor.classify("Shipped one. Fixed two. Deployed three.");
        assert!((productive.productivity_score - 0.8).abs() < 1e-12);

        let stuck = HeuristicExtractor.classify("Waiting on infra. Blocked on security.");
        assert!((stuck.productivity_score - 0.4).abs() < 1e-12);
    }

    #[test]
    fn empty_text_yields_default_fields() {
        let fields = HeuristicExtractor.classify("   ");
        assert_eq!(fields, ExtractedFields::default());
        assert_eq!(fields.productivity_score, 0.0);
    }

    #[test]
    fn classification_is_deterministic() {
        let a = HeuristicExtractor.classify(SAMPLE);
        let b = HeuristicExtractor.classify(SAMPLE);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn works_through_the_extractor_trait() {
        let extractor: &dyn FieldExtractor = &HeuristicExtractor;
        let fields = extractor.extract(SAMPLE).await.unwrap();
        assert!(!fields.completed_tasks.is_empty());
    }
}
