use std::path::Path;

use cadence_serve::ServeConfig;

/// `cadence serve`: run the HTTP API.
pub fn execute(repo_root: &Path, bind: &str, port: u16) -> anyhow::Result<()> {
    let config = ServeConfig {
        bind: bind.to_string(),
        port,
    };
    tokio::runtime::Runtime::new()?.block_on(cadence_serve::serve(repo_root, config))
}
