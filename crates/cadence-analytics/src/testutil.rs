//! Shared in-memory fixture for the analytics tests.

use cadence_core::{new_update_at, parse_rfc3339, ExtractedFields, Member, Update, UpdateSource};
use time::OffsetDateTime;

pub(crate) struct FakeSource {
    pub members: Vec<Member>,
    pub updates: Vec<Update>,
}

impl UpdateSource for FakeSource {
    fn fetch_updates(
        &self,
        author: Option<&str>,
        since: OffsetDateTime,
        until: OffsetDateTime,
    ) -> anyhow::Result<Vec<Update>> {
        let mut out = Vec::new();
        for u in &self.updates {
            let ts = parse_rfc3339(&u.ts)?;
            if ts >= since && ts <= until && author.is_none_or(|a| u.author == a) {
                out.push(u.clone());
            }
        }
        Ok(out)
    }

    fn members(&self) -> anyhow::Result<Vec<Member>> {
        Ok(self.members.clone())
    }
}

pub(crate) fn member(name: &str, role: &str, department: &str) -> Member {
    Member {
        name: name.to_string(),
        role: role.to_string(),
        department: department.to_string(),
    }
}

pub(crate) fn upd_scored(author: &str, text: &str, ts: &str, score: f64) -> Update {
    let analysis = ExtractedFields {
        productivity_score: score,
        ..Default::default()
    };
    new_update_at(author, text, analysis, ts)
}

pub(crate) fn upd_with(author: &str, text: &str, ts: &str, analysis: ExtractedFields) -> Update {
    new_update_at(author, text, analysis, ts)
}

/// Pinned "now" shared by the analytics tests: 2026-03-01 00:00 UTC.
pub(crate) fn now() -> OffsetDateTime {
    parse_rfc3339("2026-03-01T00:00:00Z").unwrap()
}
