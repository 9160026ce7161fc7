use std::path::Path;

use cadence_store::{seed_workspace, Store};

/// `cadence seed`: fill an empty workspace with the demo roster.
pub fn execute(repo_root: &Path) -> anyhow::Result<()> {
    let store = Store::open_path(repo_root)?;
    let (members, updates) = seed_workspace(&store)?;
    println!("Seeded {members} members and {updates} updates.");
    Ok(())
}
