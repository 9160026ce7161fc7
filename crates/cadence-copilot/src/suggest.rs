//! Follow-up question suggestions.
//!
//! The default provider is a static per-kind list. The trait seam keeps
//! an LLM-backed provider possible without this crate growing a network
//! dependency.

use crate::classify::QueryKind;

/// Produces follow-up questions for a reply.
pub trait SuggestionProvider: Send + Sync {
    fn suggest(&self, kind: QueryKind, query: &str, reply: &str) -> Vec<String>;
}

/// Fixed suggestion lists keyed by query kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSuggestions;

impl SuggestionProvider for StaticSuggestions {
    fn suggest(&self, kind: QueryKind, _query: &str, _reply: &str) -> Vec<String> {
        let list: &[&str] = match kind {
            QueryKind::MissingUpdates => &[
                "Who has the most consistent update record?",
                "What departments have the highest update rates?",
                "Are there patterns in missing updates?",
            ],
            QueryKind::Productivity => &[
                "How does this compare to last month?",
                "Which teams are showing improvement?",
                "What factors are driving these changes?",
            ],
            QueryKind::Blockers => &[
                "How long have these blockers been active?",
                "Are there common patterns in blockers?",
                "Which teams are most affected?",
            ],
            QueryKind::Engagement => &[
                "What's the team's current workload?",
                "How is team engagement trending?",
                "What are the key achievements?",
            ],
            QueryKind::Unknown => &[
                "Can you provide more details?",
                "What actions should we take?",
                "How can we improve these metrics?",
            ],
        };
        list.iter().map(|s| s.to_string()).collect()
    }
}
