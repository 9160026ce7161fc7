//! Keyword classification of copilot queries.

/// What a query is asking about. Drives which responder runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    MissingUpdates,
    Productivity,
    Blockers,
    Engagement,
    Unknown,
}

impl QueryKind {
    /// Stable tag for logs and response payloads.
    pub fn tag(self) -> &'static str {
        match self {
            QueryKind::MissingUpdates => "missing_updates",
            QueryKind::Productivity => "productivity",
            QueryKind::Blockers => "blockers",
            QueryKind::Engagement => "engagement",
            QueryKind::Unknown => "unknown",
        }
    }
}

/// Keyword families checked in priority order; the first family with a
/// hit wins, so "productivity issues" reads as a productivity question,
/// not a blocker one.
const PATTERNS: &[(QueryKind, &[&str])] = &[
    (
        QueryKind::MissingUpdates,
        &["missing", "not submitted", "no update", "who has not"],
    ),
    (
        QueryKind::Productivity,
        &["productivity", "performance", "efficiency", "trends"],
    ),
    (
        QueryKind::Blockers,
        &["blocker", "obstacle", "challenge", "issue", "problem"],
    ),
    (
        QueryKind::Engagement,
        &["engagement", "participation", "active", "highest"],
    ),
];

/// Classify a free-text query. Case-insensitive substring match.
pub fn classify(query: &str) -> QueryKind {
    let q = query.to_lowercase();
    for (kind, words) in PATTERNS {
        if words.iter().any(|w| q.contains(w)) {
            return *kind;
        }
    }
    QueryKind::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_family() {
        assert_eq!(classify("Who hasn't submitted updates?"), QueryKind::MissingUpdates);
        assert_eq!(classify("show me PRODUCTIVITY trends"), QueryKind::Productivity);
        assert_eq!(classify("what are the current blockers?"), QueryKind::Blockers);
        assert_eq!(classify("which teams have high engagement"), QueryKind::Engagement);
        assert_eq!(classify("tell me a joke"), QueryKind::Unknown);
    }

    #[test]
    fn priority_order_breaks_overlaps() {
        // "missing" outranks "update" families below it
        assert_eq!(classify("missing blockers report"), QueryKind::MissingUpdates);
        // "performance" lands in productivity even with "issue" present
        assert_eq!(classify("performance issues"), QueryKind::Productivity);
    }

    #[test]
    fn tags_are_stable() {
        assert_eq!(QueryKind::MissingUpdates.tag(), "missing_updates");
        assert_eq!(QueryKind::Unknown.tag(), "unknown");
    }
}
