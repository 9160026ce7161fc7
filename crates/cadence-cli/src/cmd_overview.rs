use std::path::Path;

use cadence_analytics::team_overview;
use cadence_store::Store;

/// `cadence overview`: department rollups from the full history.
pub fn execute(repo_root: &Path, json: bool) -> anyhow::Result<()> {
    let store = Store::open_path(repo_root)?;
    let overview = team_overview(&store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
        return Ok(());
    }

    println!(
        "Team: {} updates, {:.0}% average productivity",
        overview.total_update_count,
        overview.team_productivity * 100.0
    );
    for dept in &overview.departments {
        println!(
            "\n{} - {} members, {:.0}% productivity",
            dept.name,
            dept.members.len(),
            dept.average_productivity * 100.0
        );
        for member in &dept.members {
            println!(
                "  {} ({} updates, {:.0}%)",
                member.name,
                member.update_count,
                member.average_productivity * 100.0
            );
        }
        if !dept.key_projects.is_empty() {
            println!("  key projects: {}", dept.key_projects.join("; "));
        }
        if !dept.common_blockers.is_empty() {
            println!("  blockers: {}", dept.common_blockers.join("; "));
        }
    }
    Ok(())
}
