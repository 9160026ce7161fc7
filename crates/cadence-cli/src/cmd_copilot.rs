use std::path::Path;

use cadence_copilot::answer;
use cadence_store::Store;

/// `cadence copilot`: one-shot question against the stored data.
pub fn execute(repo_root: &Path, query: &str) -> anyhow::Result<()> {
    let store = Store::open_path(repo_root)?;
    let reply = answer(&store, query)?;

    println!("{}", reply.message.trim_end());
    if !reply.suggested_questions.is_empty() {
        println!("\nTry asking:");
        for question in &reply.suggested_questions {
            println!("  - {question}");
        }
    }
    Ok(())
}
