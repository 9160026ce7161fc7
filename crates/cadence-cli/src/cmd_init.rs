use std::path::Path;

use cadence_store::{init_workspace, CadencePaths};

/// `cadence init`: create the `.cadence/` layout and a default config.
pub fn execute(repo_root: &Path) -> anyhow::Result<()> {
    let paths = CadencePaths::discover(repo_root);

    if paths.is_initialized() {
        // Fill in anything missing from a partially created workspace
        init_workspace(&paths)?;
        println!("Already initialized at {}", paths.cadence_dir.display());
        return Ok(());
    }

    init_workspace(&paths)?;
    println!("Initialized cadence workspace at {}", paths.cadence_dir.display());
    println!("Next: `cadence seed` for demo data, or `cadence submit` to record an update.");
    Ok(())
}
