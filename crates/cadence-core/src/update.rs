use crate::types::{ExtractedFields, Update};

fn new_id() -> String {
    format!("upd_{}", ulid::Ulid::new().to_string().to_lowercase())
}

/// Current UTC time as an RFC3339 string.
pub fn now_rfc3339() -> String {
    format_rfc3339(time::OffsetDateTime::now_utc())
}

/// Format any instant as an RFC3339 string.
pub fn format_rfc3339(t: time::OffsetDateTime) -> String {
    t.format(&time::format_description::well_known::Rfc3339)
        .expect("RFC3339 formatting should not fail")
}

/// Parse an RFC3339 `ts` back into an `OffsetDateTime`.
pub fn parse_rfc3339(ts: &str) -> anyhow::Result<time::OffsetDateTime> {
    time::OffsetDateTime::parse(ts, &time::format_description::well_known::Rfc3339)
        .map_err(|e| anyhow::anyhow!("bad RFC3339 timestamp {ts:?}: {e}"))
}

/// Create a new update stamped with the current time.
pub fn new_update(author: &str, text: &str, analysis: ExtractedFields) -> Update {
    new_update_at(author, text, analysis, &now_rfc3339())
}

/// Create a new update with an explicit timestamp (seed data, tests).
pub fn new_update_at(author: &str, text: &str, analysis: ExtractedFields, ts: &str) -> Update {
    Update {
        id: new_id(),
        author: author.to_string(),
        ts: ts.to_string(),
        text: text.to_string(),
        analysis,
    }
}
