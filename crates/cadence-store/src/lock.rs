use std::fs::OpenOptions;
use std::io::Write;

use fs2::FileExt;

use crate::paths::CadencePaths;

/// Write guard over `.cadence/LOCK`.
///
/// A submission is an upsert-then-append sequence across `roster.jsonl`
/// and `updates.jsonl`, and seeding writes both files wholesale; the
/// guard keeps two writers from interleaving those sequences. Reads
/// never take it. Dropping the guard releases the lock.
pub struct WorkspaceLock {
    file: std::fs::File,
}

impl WorkspaceLock {
    /// Take the exclusive workspace lock without blocking.
    ///
    /// Submissions are short; a lock that is already held means another
    /// cadence process is mid-write, so fail fast and let the caller
    /// retry rather than queue up behind it.
    pub fn acquire(paths: &CadencePaths) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&paths.lock_file)?;
        if file.try_lock_exclusive().is_err() {
            anyhow::bail!(
                "another cadence process is writing to this workspace ({})",
                paths.lock_file.display()
            );
        }
        // Leave the holder's pid in the file so whoever hits the error
        // above can tell who has it.
        let mut guard = Self { file };
        let _ = guard.file.set_len(0);
        let _ = writeln!(guard.file, "{}", std::process::id());
        Ok(guard)
    }
}
