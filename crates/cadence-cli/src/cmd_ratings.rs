use std::path::Path;

use cadence_analytics::{employee_ratings, EmployeePerformance, RatingsPeriod};
use cadence_store::Store;

/// `cadence ratings`: performance tiers over a window.
pub fn execute(repo_root: &Path, period: &str) -> anyhow::Result<()> {
    let store = Store::open_path(repo_root)?;
    let period = RatingsPeriod::parse(period)?;
    let report = employee_ratings(&store, period)?;

    if report.total_employees == 0 {
        println!("No rated members: nobody posted in the window.");
        return Ok(());
    }

    println!(
        "{} members rated over {}",
        report.total_employees, report.evaluation_period
    );
    print_tier("Top performers", &report.top_performers);
    print_tier("Strong performers", &report.strong_performers);
    print_tier("Everyone else", &report.other_performers);
    Ok(())
}

fn print_tier(label: &str, members: &[EmployeePerformance]) {
    if members.is_empty() {
        return;
    }
    println!("\n{label}:");
    for member in members {
        println!(
            "  #{} {} [{}] - {} tasks, {:.0}% productivity",
            member.ranking,
            member.name,
            member.department,
            member.metrics.completed_tasks_count,
            member.metrics.productivity_score * 100.0
        );
    }
}
