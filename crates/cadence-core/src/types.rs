use serde::{Deserialize, Serialize};

/// Update ID format: `upd_<ulid>`
pub type UpdateId = String;

/// Department assigned when no role keyword matches.
pub const UNKNOWN_DEPARTMENT: &str = "Unknown";

/// A roster entry: one team member known to the workspace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    /// Canonical display name, `"Full Name - Role"`.
    pub name: String,
    pub role: String,
    pub department: String,
}

/// Structured fields extracted from one update's text.
///
/// Every list defaults to empty and the score to 0.0 so records written
/// before extraction ran still deserialize.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractedFields {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub completed_tasks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_progress: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals_status: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blockers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_week_plans: Vec<String>,
    /// In [0,1]; 0.0 when extraction produced no score.
    #[serde(default)]
    pub productivity_score: f64,
}

/// A single weekly update (one JSONL line in updates.jsonl).
///
/// Immutable once appended; per author, records are ordered by `ts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Update {
    pub id: UpdateId,
    /// Member name exactly as it appears in the roster.
    pub author: String,
    /// RFC3339 submission timestamp.
    pub ts: String,
    /// The raw text as submitted.
    pub text: String,
    #[serde(default)]
    pub analysis: ExtractedFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_round_trip_serialize() {
        let update = Update {
            id: "upd_01jtest".to_string(),
            author: "Ada Lovelace - Senior Developer".to_string(),
            ts: "2026-03-02T09:00:00Z".to_string(),
            text: "Shipped the parser rewrite.".to_string(),
            analysis: ExtractedFields {
                completed_tasks: vec!["Shipped parser rewrite".to_string()],
                productivity_score: 0.9,
                ..Default::default()
            },
        };
        let json = serde_json::to_string(&update).unwrap();
        let back: Update = serde_json::from_str(&json).unwrap();
        assert_eq!(back, update);
    }

    #[test]
    fn old_record_without_analysis_deserializes() {
        let json = r#"{
            "id": "upd_old",
            "author": "Ada Lovelace - Senior Developer",
            "ts": "2026-01-01T00:00:00Z",
            "text": "pre-extraction record"
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert!(update.analysis.completed_tasks.is_empty());
        assert_eq!(update.analysis.productivity_score, 0.0);
    }

    #[test]
    fn empty_lists_not_serialized() {
        let update = Update {
            id: "upd_x".to_string(),
            author: "A - B".to_string(),
            ts: "2026-01-01T00:00:00Z".to_string(),
            text: "t".to_string(),
            analysis: ExtractedFields::default(),
        };
        let json = serde_json::to_string(&update).unwrap();
        assert!(!json.contains("completed_tasks"));
        assert!(!json.contains("blockers"));
        assert!(json.contains("productivity_score"));
    }
}
