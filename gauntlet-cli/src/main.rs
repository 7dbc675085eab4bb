//! GAUNTLET CLI - Command-line interface
//!
//! Commands:
//! - run: Play a seeded tournament and write its event log
//! - replay: Summarize rounds from an event log

mod replay_cmd;
mod run_cmd;
mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use replay_cmd::ReplayArgs;
use run_cmd::RunArgs;
use settings::Settings;

#[derive(Parser)]
#[command(name = "gauntlet")]
#[command(about = "GAUNTLET multi-agent elimination arena")]
struct Cli {
    /// Settings file (JSON); defaults are used if it does not exist
    #[arg(long, global = true, value_name = "FILE", default_value = "config/settings.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a tournament
    Run(RunArgs),
    /// Replay an event log
    Replay(ReplayArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let settings = Settings::load(Some(cli.config.as_path()))?.apply(&args.overrides());
            init_logging(&settings.log_level);
            settings.validate()?;
            run_cmd::run(&settings, args.json)
        }
        Commands::Replay(args) => {
            let settings = Settings::load(Some(cli.config.as_path()))?;
            init_logging(&settings.log_level);
            replay_cmd::run(args)
        }
    }
}

/// RUST_LOG wins over the configured level
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
