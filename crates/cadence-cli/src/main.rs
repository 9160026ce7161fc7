mod cmd_copilot;
mod cmd_history;
mod cmd_init;
mod cmd_members;
mod cmd_overview;
mod cmd_ratings;
mod cmd_seed;
mod cmd_serve;
mod cmd_stalling;
mod cmd_submit;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cadence", version, about = "Team update tracking and stall analytics")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a new .cadence/ workspace
    Init,
    /// Submit a weekly update
    Submit {
        /// Member in "Full Name - Role" form
        member: String,
        /// Update text (10 to 2000 characters)
        text: String,
        /// Skip the chat API and use the offline extractor
        #[arg(long)]
        offline: bool,
    },
    /// Fill an empty workspace with demo data
    Seed,
    /// List roster members
    Members,
    /// Show submission history, newest first
    History {
        /// Maximum updates to show
        #[arg(long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the team overview by department
    Overview {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flag authors whose updates stopped changing
    Stalling {
        /// Analysis window in days (default from config, 60)
        #[arg(long)]
        days: Option<i64>,
        /// Similarity cutoff in (0,1) (default from config, 0.85)
        #[arg(long)]
        threshold: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rank member performance over a window
    Ratings {
        /// Window: 30d, 90d, 180d, or 365d
        #[arg(long, default_value = "90d")]
        period: String,
    },
    /// Ask the data copilot a question
    Copilot {
        /// Natural-language question
        query: String,
    },
    /// Run the HTTP API server
    Serve {
        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;
    // `init` acts on the current directory; everything else walks up to
    // the enclosing workspace first
    let repo_root = cadence_store::CadencePaths::find_root(&cwd).unwrap_or_else(|| cwd.clone());

    match cli.cmd {
        Command::Init => cmd_init::execute(&cwd),
        Command::Submit {
            member,
            text,
            offline,
        } => cmd_submit::execute(&repo_root, &member, &text, offline),
        Command::Seed => cmd_seed::execute(&repo_root),
        Command::Members => cmd_members::execute(&repo_root),
        Command::History { limit, json } => cmd_history::execute(&repo_root, limit, json),
        Command::Overview { json } => cmd_overview::execute(&repo_root, json),
        Command::Stalling {
            days,
            threshold,
            json,
        } => cmd_stalling::execute(&repo_root, days, threshold, json),
        Command::Ratings { period } => cmd_ratings::execute(&repo_root, &period),
        Command::Copilot { query } => cmd_copilot::execute(&repo_root, &query),
        Command::Serve { bind, port } => cmd_serve::execute(&repo_root, &bind, port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
