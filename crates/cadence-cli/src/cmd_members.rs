use std::path::Path;

use cadence_store::Store;

/// `cadence members`: list the roster.
pub fn execute(repo_root: &Path) -> anyhow::Result<()> {
    let store = Store::open_path(repo_root)?;
    let members = store.members()?;
    if members.is_empty() {
        println!("No members yet. `cadence submit` adds them as they post.");
        return Ok(());
    }
    for member in members {
        println!("{}  [{}]", member.name, member.department);
    }
    Ok(())
}
