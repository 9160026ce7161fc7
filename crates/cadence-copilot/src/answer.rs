//! Reply assembly: classify the query, run the matching responder, and
//! format the bullet-list answer with its structured payload.

use serde::Serialize;
use time::OffsetDateTime;

use cadence_core::{AnalysisError, UpdateSource};

use crate::classify::{classify, QueryKind};
use crate::respond::{
    current_blockers, missing_updates, productivity_by_department, team_engagement,
};
use crate::suggest::{StaticSuggestions, SuggestionProvider};

/// Default lookback for "who hasn't posted" questions, in days.
pub const MISSING_UPDATES_DAYS: i64 = 7;
/// Default lookback for trend and engagement questions, in days.
pub const METRICS_DAYS: i64 = 30;
/// Cap on blocker items returned.
pub const BLOCKER_LIMIT: usize = 50;

/// Severity of a reply: a plain answer, a nudge, or something that
/// needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyKind {
    Insight,
    Suggestion,
    Alert,
}

/// One answered query.
#[derive(Debug, Clone, Serialize)]
pub struct CopilotReply {
    pub message: String,
    pub kind: ReplyKind,
    /// Tag of the matched [`QueryKind`].
    pub query_kind: String,
    /// Structured payload backing the message, for chart rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub suggested_questions: Vec<String>,
}

fn payload<T: Serialize>(value: &T) -> Option<serde_json::Value> {
    serde_json::to_value(value).ok()
}

/// Answer with the default static suggestions and the current clock.
pub fn answer(source: &dyn UpdateSource, query: &str) -> Result<CopilotReply, AnalysisError> {
    answer_at(source, query, OffsetDateTime::now_utc(), &StaticSuggestions)
}

/// Answer with a pinned clock and caller-chosen suggestion provider.
pub fn answer_at(
    source: &dyn UpdateSource,
    query: &str,
    now: OffsetDateTime,
    suggestions: &dyn SuggestionProvider,
) -> Result<CopilotReply, AnalysisError> {
    let kind = classify(query);
    tracing::debug!(query_kind = kind.tag(), "answering copilot query");

    let (message, reply_kind, data) = match kind {
        QueryKind::MissingUpdates => {
            let missing = missing_updates(source, MISSING_UPDATES_DAYS, now)?;
            if missing.is_empty() {
                (
                    "Great news! All team members have submitted their updates this week."
                        .to_string(),
                    ReplyKind::Suggestion,
                    None,
                )
            } else {
                let mut message = format!(
                    "Found {} team members who haven't submitted updates in the past week:\n\n",
                    missing.len()
                );
                for member in &missing {
                    let last = member.last_update.as_deref().unwrap_or("Never");
                    message.push_str(&format!(
                        "• {} ({}) - Last update: {last}\n",
                        member.name, member.department
                    ));
                }
                (message, ReplyKind::Alert, payload(&missing))
            }
        }
        QueryKind::Productivity => {
            let trends = productivity_by_department(source, METRICS_DAYS, now)?;
            let mut message = "Here are the productivity trends by department:\n\n".to_string();
            for (dept, days) in &trends {
                let avg = days.iter().map(|d| d.score).sum::<f64>() / days.len() as f64;
                message.push_str(&format!(
                    "• {dept}: {:.1}% average productivity\n",
                    avg * 100.0
                ));
            }
            (message, ReplyKind::Insight, payload(&trends))
        }
        QueryKind::Blockers => {
            let blockers = current_blockers(source, BLOCKER_LIMIT, now)?;
            if blockers.is_empty() {
                (
                    "No active blockers reported across teams.".to_string(),
                    ReplyKind::Suggestion,
                    None,
                )
            } else {
                let mut message = "Current blockers across teams:\n\n".to_string();
                for item in &blockers {
                    message.push_str(&format!("• {} - {}:\n", item.department, item.employee));
                    for blocker in &item.blockers {
                        message.push_str(&format!("  - {blocker}\n"));
                    }
                }
                (message, ReplyKind::Alert, payload(&blockers))
            }
        }
        QueryKind::Engagement => {
            let rows = team_engagement(source, METRICS_DAYS, now)?;
            let mut message = "Team engagement metrics:\n\n".to_string();
            for row in &rows {
                message.push_str(&format!("• {}:\n", row.department));
                message.push_str(&format!("  - Active members: {}\n", row.active_members));
                message.push_str(&format!("  - Updates submitted: {}\n", row.update_count));
                message.push_str(&format!(
                    "  - Engagement score: {:.1}\n",
                    row.engagement_score
                ));
            }
            (message, ReplyKind::Insight, payload(&rows))
        }
        QueryKind::Unknown => (
            "I'm not sure how to help with that query. You can ask me about:\n\
             • Missing team updates (e.g., 'Who hasn't submitted updates?')\n\
             • Team productivity trends (e.g., 'Show me productivity trends')\n\
             • Current blockers (e.g., 'What are the current blockers?')\n\
             • Team engagement (e.g., 'Which teams have high engagement?')"
                .to_string(),
            ReplyKind::Suggestion,
            None,
        ),
    };

    let suggested_questions = suggestions.suggest(kind, query, &message);
    Ok(CopilotReply {
        message,
        kind: reply_kind,
        query_kind: kind.tag().to_string(),
        data,
        suggested_questions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{member, now, upd_with, FakeSource};

    fn fixture() -> FakeSource {
        FakeSource {
            members: vec![
                member("Ada - Senior Developer", "Development"),
                member("Bo - Product Manager", "Product Management"),
            ],
            updates: vec![
                upd_with("Ada - Senior Developer", "2026-02-25T09:00:00Z", 0.8, &[]),
                upd_with(
                    "Bo - Product Manager",
                    "2026-02-10T09:00:00Z",
                    0.6,
                    &["waiting on budget sign-off"],
                ),
            ],
        }
    }

    fn ask(source: &FakeSource, query: &str) -> CopilotReply {
        answer_at(source, query, now(), &StaticSuggestions).unwrap()
    }

    #[test]
    fn missing_updates_reply_lists_quiet_members() {
        let reply = ask(&fixture(), "who hasn't submitted updates?");
        assert_eq!(reply.kind, ReplyKind::Alert);
        assert_eq!(reply.query_kind, "missing_updates");
        assert!(reply.message.contains("Bo - Product Manager"));
        assert!(reply.message.contains("Last update: 2026-02-10"));
        assert!(reply.data.is_some());
        assert_eq!(reply.suggested_questions.len(), 3);
    }

    #[test]
    fn all_posted_is_a_suggestion_without_data() {
        let mut source = fixture();
        source.members.truncate(1);
        let reply = ask(&source, "any missing updates?");
        assert_eq!(reply.kind, ReplyKind::Suggestion);
        assert!(reply.message.starts_with("Great news!"));
        assert!(reply.data.is_none());
    }

    #[test]
    fn productivity_reply_averages_per_department() {
        let reply = ask(&fixture(), "show me productivity trends");
        assert_eq!(reply.kind, ReplyKind::Insight);
        assert!(reply.message.contains("• Development: 80.0% average productivity"));
        assert!(reply.message.contains("• Product Management: 60.0%"));
    }

    #[test]
    fn blockers_reply_nests_items_under_authors() {
        let reply = ask(&fixture(), "what are the current blockers?");
        assert_eq!(reply.kind, ReplyKind::Alert);
        assert!(reply.message.contains("• Product Management - Bo - Product Manager:"));
        assert!(reply.message.contains("  - waiting on budget sign-off"));
    }

    #[test]
    fn engagement_reply_reports_scores() {
        let reply = ask(&fixture(), "which teams have high engagement?");
        assert_eq!(reply.kind, ReplyKind::Insight);
        assert!(reply.message.contains("Engagement score: 1.0"));
    }

    #[test]
    fn unknown_query_returns_capability_help() {
        let reply = ask(&fixture(), "what is for lunch");
        assert_eq!(reply.kind, ReplyKind::Suggestion);
        assert_eq!(reply.query_kind, "unknown");
        assert!(reply.message.contains("You can ask me about"));
    }

    #[test]
    fn reply_serializes_with_lowercase_kind() {
        let reply = ask(&fixture(), "blockers?");
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["kind"], "alert");
        assert_eq!(json["query_kind"], "blockers");
    }
}
