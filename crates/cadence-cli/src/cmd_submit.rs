use std::path::Path;

use cadence_core::member::{parse_member_name, validate_update_text};
use cadence_core::ExtractedFields;
use cadence_extract::{
    api_key_from_env, ChatConfig, ChatExtractor, FieldExtractor, HeuristicExtractor,
};
use cadence_store::{Store, WorkspaceConfig};

/// `cadence submit`: record one weekly update, extracting structured
/// fields on the way in.
pub fn execute(repo_root: &Path, member: &str, text: &str, offline: bool) -> anyhow::Result<()> {
    let (name, role) = parse_member_name(member)?;
    validate_update_text(text)?;

    let store = Store::open_path(repo_root)?;
    let config = WorkspaceConfig::load(&store.paths);
    let analysis = extract_fields(&config, text, offline)?;

    let (member, update) = store.record_update(&name, &role, text, analysis)?;
    println!("Recorded {} for {} [{}]", update.id, member.name, member.department);
    print_analysis(&update.analysis);
    Ok(())
}

/// Chat extraction when a key is configured and `--offline` was not
/// given; heuristic otherwise, and as the degraded path when the chat
/// API is down.
fn extract_fields(
    config: &WorkspaceConfig,
    text: &str,
    offline: bool,
) -> anyhow::Result<ExtractedFields> {
    if offline {
        return Ok(HeuristicExtractor.classify(text));
    }
    let Some(api_key) = api_key_from_env() else {
        tracing::debug!("no API key configured; using offline extractor");
        return Ok(HeuristicExtractor.classify(text));
    };

    let chat = ChatExtractor::new(ChatConfig {
        api_base: config.extraction.api_base.clone(),
        model: config.extraction.model.clone(),
        timeout_secs: config.extraction.timeout_secs,
        max_retries: config.extraction.max_retries,
        api_key,
    })?;
    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(chat.extract(text)) {
        Ok(fields) => Ok(fields),
        Err(e) => {
            tracing::warn!("chat extraction failed ({e}); degrading to heuristic");
            Ok(HeuristicExtractor.classify(text))
        }
    }
}

fn print_analysis(analysis: &ExtractedFields) {
    let sections = [
        ("Completed", &analysis.completed_tasks),
        ("In progress", &analysis.project_progress),
        ("Goals", &analysis.goals_status),
        ("Blockers", &analysis.blockers),
        ("Next week", &analysis.next_week_plans),
    ];
    for (label, items) in sections {
        if items.is_empty() {
            continue;
        }
        println!("{label}:");
        for item in items {
            println!("  - {item}");
        }
    }
    println!("Productivity score: {:.2}", analysis.productivity_score);
}
