//! Replay command - rebuild round summaries from an event log

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use gauntlet_observe::{ReplayEngine, ReplayLog};

#[derive(Args)]
pub struct ReplayArgs {
    /// Event log to replay
    #[arg(value_name = "LOG")]
    pub log: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ReplayArgs) -> Result<()> {
    let engine = ReplayEngine::open(&args.log)
        .with_context(|| format!("Failed to open event log: {}", args.log.display()))?;
    let log = engine
        .replay_log()
        .with_context(|| format!("Failed to replay: {}", args.log.display()))?;

    tracing::info!("Replayed {} events across {} rounds", log.events_read, log.rounds.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&log)?);
    } else {
        print_log(&log);
    }
    Ok(())
}

fn print_log(log: &ReplayLog) {
    if let Some(agents) = &log.initial_agents {
        println!("Initial roster ({}): {}", agents.len(), agents.join(", "));
    }

    for round in &log.rounds {
        println!(
            "\nRound {}: {} responses, {} votes",
            round.round_number, round.num_responses, round.num_votes
        );
        println!("  Prompt: {}", round.prompt);

        let counts: Vec<String> = round
            .vote_counts
            .iter()
            .map(|(agent_id, count)| format!("{}={}", agent_id, count))
            .collect();
        if !counts.is_empty() {
            println!("  Votes: {}", counts.join(" "));
        }

        if let Some(eliminated) = &round.eliminated_agent_id {
            println!("  Eliminated: {}", eliminated);
        }
        for replaced in &round.replaced_agent_ids {
            println!("  Replaced: {}", replaced);
        }
    }

    if !log.duplicate_summaries.is_empty() {
        println!("\nRounds with repeated vote summaries: {:?}", log.duplicate_summaries);
    }
}
