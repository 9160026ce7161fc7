use std::path::Path;

use cadence_analytics::update_history;
use cadence_store::Store;

/// `cadence history`: recent submissions, newest first.
pub fn execute(repo_root: &Path, limit: Option<usize>, json: bool) -> anyhow::Result<()> {
    let store = Store::open_path(repo_root)?;
    let updates = update_history(&store, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&updates)?);
        return Ok(());
    }

    if updates.is_empty() {
        println!("No updates yet.");
        return Ok(());
    }
    for update in updates {
        let day = update.ts.split('T').next().unwrap_or(&update.ts);
        println!("{day}  {}", update.author);
        for line in update.text.lines().take(2) {
            println!("    {line}");
        }
        if !update.analysis.blockers.is_empty() {
            println!("    blockers: {}", update.analysis.blockers.len());
        }
    }
    Ok(())
}
