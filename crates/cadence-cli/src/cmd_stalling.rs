use std::path::Path;

use cadence_stall::{analyze_stalling, StallParams};
use cadence_store::{Store, WorkspaceConfig};

/// `cadence stalling`: the stalled-progress report.
pub fn execute(
    repo_root: &Path,
    days: Option<i64>,
    threshold: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let store = Store::open_path(repo_root)?;
    let defaults = WorkspaceConfig::load(&store.paths).analysis;
    let params = StallParams {
        days: days.unwrap_or(defaults.days),
        threshold: threshold.unwrap_or(defaults.threshold),
        max_updates_per_author: defaults.max_updates_per_author,
    };

    let report = analyze_stalling(&store, &params)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} (threshold {:.2}), {} author(s) analyzed",
        report.analysis_period,
        report.similarity_threshold,
        report.results.len()
    );
    if report.skipped_pairs > 0 {
        println!("note: {} pair(s) skipped (unreadable text)", report.skipped_pairs);
    }

    for author in &report.results {
        let avg = match author.average_similarity {
            Some(v) => format!("{v:.2}"),
            None => "n/a".to_string(),
        };
        println!(
            "\n{} [{}] - {} updates, average similarity {avg}",
            author.author, author.department, author.update_count
        );
        if author.truncated {
            println!("  (truncated to the most recent {} updates)", author.update_count);
        }
        if author.stalled_periods.is_empty() {
            println!("  no stalled periods");
            continue;
        }
        for period in &author.stalled_periods {
            let from = period.start_date.split('T').next().unwrap_or(&period.start_date);
            let to = period.end_date.split('T').next().unwrap_or(&period.end_date);
            println!("  STALLED {from} .. {to} (similarity {:.2})", period.score);
        }
    }
    Ok(())
}
