use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use time::OffsetDateTime;

use cadence_core::member::department_for_role;
use cadence_core::source::UpdateSource;
use cadence_core::{new_update, parse_rfc3339, ExtractedFields, Member, Update};

use crate::config::WorkspaceConfig;
use crate::lock::WorkspaceLock;
use crate::paths::CadencePaths;

/// The append-only update store backed by `.cadence/*.jsonl`.
///
/// `roster.jsonl` holds one `Member` per line, `updates.jsonl` one `Update`
/// per line. Mutations append; nothing is rewritten in place.
pub struct Store {
    pub paths: CadencePaths,
}

impl Store {
    /// Open an existing workspace. Fails if `.cadence/` does not exist.
    pub fn open(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let paths = CadencePaths::discover(root);
        if !paths.is_initialized() {
            anyhow::bail!(
                "not a cadence workspace ({}/.cadence not found). Run `cadence init` first.",
                paths.root.display()
            );
        }
        Ok(Self { paths })
    }

    /// Convenience: open from a Path ref (avoids Into<PathBuf> ambiguity).
    pub fn open_path(root: &Path) -> anyhow::Result<Self> {
        Self::open(root.to_path_buf())
    }

    // ── Roster ──

    /// All roster entries in insertion order.
    pub fn members(&self) -> anyhow::Result<Vec<Member>> {
        read_jsonl(&self.paths.roster_jsonl)
    }

    /// Look up one member by canonical name.
    pub fn member(&self, name: &str) -> anyhow::Result<Option<Member>> {
        Ok(self.members()?.into_iter().find(|m| m.name == name))
    }

    /// Append a roster entry. Callers hold the workspace lock.
    pub fn append_member(&self, member: &Member) -> anyhow::Result<()> {
        append_jsonl(&self.paths.roster_jsonl, member)
    }

    // ── Updates ──

    /// Append an update to `updates.jsonl`. Callers hold the workspace lock.
    pub fn append_update(&self, update: &Update) -> anyhow::Result<()> {
        append_jsonl(&self.paths.updates_jsonl, update)
    }

    /// All updates, ascending by timestamp (id breaks ties).
    pub fn updates(&self) -> anyhow::Result<Vec<Update>> {
        Ok(self.sorted_updates()?.into_iter().map(|(_, u)| u).collect())
    }

    /// Updates with `since <= ts <= until`, optionally for one author.
    pub fn updates_in_window(
        &self,
        author: Option<&str>,
        since: OffsetDateTime,
        until: OffsetDateTime,
    ) -> anyhow::Result<Vec<Update>> {
        Ok(self
            .sorted_updates()?
            .into_iter()
            .filter(|(ts, u)| {
                *ts >= since && *ts <= until && author.is_none_or(|a| u.author == a)
            })
            .map(|(_, u)| u)
            .collect())
    }

    /// Record one submission: upsert the roster entry, then append the
    /// update, under a single lock acquisition. `name` must already be in
    /// the canonical `"Full Name - Role"` form.
    pub fn record_update(
        &self,
        name: &str,
        role: &str,
        text: &str,
        analysis: ExtractedFields,
    ) -> anyhow::Result<(Member, Update)> {
        let _lock = WorkspaceLock::acquire(&self.paths)?;
        let member = match self.member(name)? {
            Some(existing) => existing,
            None => {
                let member = Member {
                    name: name.to_string(),
                    role: role.to_string(),
                    department: department_for_role(role).to_string(),
                };
                self.append_member(&member)?;
                tracing::info!(
                    member = %member.name,
                    department = %member.department,
                    "added roster entry"
                );
                member
            }
        };
        let update = new_update(name, text, analysis);
        self.append_update(&update)?;
        Ok((member, update))
    }

    /// Updates paired with parsed timestamps, sorted ascending.
    ///
    /// RFC3339 strings with mixed fractional precision do not sort
    /// lexically, so ordering always goes through the parsed time. A record
    /// whose `ts` does not parse is corrupt data and fails the read.
    fn sorted_updates(&self) -> anyhow::Result<Vec<(OffsetDateTime, Update)>> {
        let updates: Vec<Update> = read_jsonl(&self.paths.updates_jsonl)?;
        let mut keyed = Vec::with_capacity(updates.len());
        for update in updates {
            let ts = parse_rfc3339(&update.ts)
                .map_err(|e| anyhow::anyhow!("update {}: {e}", update.id))?;
            keyed.push((ts, update));
        }
        keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
        Ok(keyed)
    }
}

impl UpdateSource for Store {
    fn fetch_updates(
        &self,
        author: Option<&str>,
        since: OffsetDateTime,
        until: OffsetDateTime,
    ) -> anyhow::Result<Vec<Update>> {
        self.updates_in_window(author, since, until)
    }

    fn members(&self) -> anyhow::Result<Vec<Member>> {
        Store::members(self)
    }
}

/// Initialize a new workspace from `CadencePaths`. Used by `cadence init`.
/// Writes a default config.json on first initialization.
pub fn init_workspace(paths: &CadencePaths) -> anyhow::Result<()> {
    paths.ensure_layout()?;
    if !paths.config_json.exists() {
        WorkspaceConfig::default().save(&paths.config_json)?;
    }
    Ok(())
}

fn append_jsonl<T: serde::Serialize>(path: &Path, record: &T) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let json = serde_json::to_string(record)?;
    writeln!(file, "{json}")?;
    Ok(())
}

fn read_jsonl<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}
