//! `aidform` command line: read tax documents, print the aid-form answers
//! found in them.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{batch, config, extract, rules};

/// Read 1040s, W-2s, 1099s and SSN letters and report the answers they
/// hold for FAFSA and CSS Profile questions
#[derive(Parser)]
#[command(name = "aidform", version, about)]
#[command(after_help = "Set RUST_LOG to override the log filter chosen by -v/-q.")]
struct Cli {
    /// Log more detail to stderr (-v rule hits, -vv block decisions)
    #[arg(short, long, action = ArgAction::Count, global = true, conflicts_with = "quiet")]
    verbose: u8,

    /// Log errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file to use instead of the per-user one
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull fields out of one document
    Extract(extract::ExtractArgs),

    /// Pull fields out of every document matching a glob
    Batch(batch::BatchArgs),

    /// Show the label rules applied to a document type
    Rules(rules::RulesArgs),

    /// Create, show or edit the configuration file
    Config(config::ConfigArgs),
}

/// Filter directive for our own crates; dependencies stay at `warn`.
fn log_directive(verbose: u8, quiet: bool) -> String {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    if quiet {
        return level.to_string();
    }
    format!("warn,aidform={level},aidform_core={level}")
}

fn init_logging(verbose: u8, quiet: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_directive(verbose, quiet)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose > 1)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Rules(args) => rules::run(args).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
