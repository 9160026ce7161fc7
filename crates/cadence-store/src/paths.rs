use std::path::{Path, PathBuf};

/// All well-known paths under `.cadence/`.
#[derive(Debug, Clone)]
pub struct CadencePaths {
    pub root: PathBuf,
    pub cadence_dir: PathBuf,
    pub roster_jsonl: PathBuf,
    pub updates_jsonl: PathBuf,
    pub config_json: PathBuf,
    pub lock_file: PathBuf,
}

impl CadencePaths {
    /// Derive all paths from a workspace root. Pure computation, no I/O.
    pub fn discover(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let cadence_dir = root.join(".cadence");
        Self {
            roster_jsonl: cadence_dir.join("roster.jsonl"),
            updates_jsonl: cadence_dir.join("updates.jsonl"),
            config_json: cadence_dir.join("config.json"),
            lock_file: cadence_dir.join("LOCK"),
            cadence_dir,
            root,
        }
    }

    /// Create the directory layout. Idempotent.
    pub fn ensure_layout(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.cadence_dir)?;
        Ok(())
    }

    /// Check whether `.cadence/` exists.
    pub fn is_initialized(&self) -> bool {
        self.cadence_dir.is_dir()
    }

    /// Walk up from `start` looking for a directory containing `.cadence/`.
    /// Returns `None` if not found.
    pub fn find_root(start: &Path) -> Option<PathBuf> {
        let mut cur = start.to_path_buf();
        loop {
            if cur.join(".cadence").is_dir() {
                return Some(cur);
            }
            if !cur.pop() {
                return None;
            }
        }
    }
}
