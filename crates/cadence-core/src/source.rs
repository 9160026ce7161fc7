use time::OffsetDateTime;

use crate::types::{Member, Update};

/// Read interface the analysis layers consume.
///
/// Implementations return updates ascending by timestamp; analysis code
/// re-sorts before pairing consecutive updates in case a backend cannot
/// guarantee order.
pub trait UpdateSource {
    /// Updates with `since <= ts <= until`, optionally restricted to one
    /// author, ascending by timestamp.
    fn fetch_updates(
        &self,
        author: Option<&str>,
        since: OffsetDateTime,
        until: OffsetDateTime,
    ) -> anyhow::Result<Vec<Update>>;

    /// The full roster.
    fn members(&self) -> anyhow::Result<Vec<Member>>;
}
