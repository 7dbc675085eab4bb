//! Run command - play a full seeded tournament
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_controller(), run_schedule(), report_results()
//! - Level 3: ensure_fresh_log(), spawn_roster()
//! - Level 4: formatting utilities

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;

use gauntlet_core::{Agent, Roster};
use gauntlet_evolve::{PersonalityGenerator, PostMortemRecord, ReplacementCoordinator};
use gauntlet_observe::EventLog;
use gauntlet_tournament::{run_schedule, ArenaController, ScheduleReport, SeededBallots};

use crate::settings::{Overrides, Settings};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RunArgs {
    /// Random seed (overrides the settings file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of rounds to play
    #[arg(long)]
    pub rounds: Option<usize>,

    /// Number of agents in the arena
    #[arg(long)]
    pub agents: Option<usize>,

    /// Event log output path
    #[arg(long, value_name = "FILE")]
    pub event_log: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            seed: self.seed,
            rounds: self.rounds,
            agents: self.agents,
            event_log: self.event_log.clone(),
        }
    }
}

/// Final state of a run, as printed
#[derive(Debug, Serialize)]
struct RunSummary {
    event_log: PathBuf,
    report: ScheduleReport,
    standings: Vec<Standing>,
    post_mortems: Vec<PostMortemRecord>,
}

#[derive(Debug, Serialize)]
struct Standing {
    agent_id: String,
    personality: String,
    cumulative_votes: u32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run the tournament described by `settings`
///
/// 1. Spawn the roster and controller
/// 2. Play every scheduled round
/// 3. Report results
pub fn run(settings: &Settings, json: bool) -> Result<()> {
    tracing::info!(
        "Starting tournament: {} agents, {} rounds, seed={}",
        settings.num_agents,
        settings.rounds,
        settings.random_seed
    );

    let mut controller = build_controller(settings)?;
    let schedule = settings.schedule();
    let mut ballots = SeededBallots::new(settings.random_seed);

    let report = run_schedule(&mut controller, &schedule, &mut ballots).context("Tournament aborted")?;

    let summary = summarize(&controller, report, settings);
    report_results(&summary, json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Controller with a seeded roster, replacement enabled and the event log attached
pub fn build_controller(settings: &Settings) -> Result<ArenaController> {
    let mut generator = PersonalityGenerator::new(settings.random_seed);
    let roster = spawn_roster(settings, &mut generator)?;

    ensure_fresh_log(&settings.event_log)?;
    let log = EventLog::open(&settings.event_log)
        .with_context(|| format!("Failed to open event log: {}", settings.event_log.display()))?;

    let controller = ArenaController::new(roster, settings.arena_config())
        .with_replacement(ReplacementCoordinator::new(generator))
        .with_event_log(log)?;
    Ok(controller)
}

fn summarize(controller: &ArenaController, report: ScheduleReport, settings: &Settings) -> RunSummary {
    let standings = controller
        .roster()
        .iter()
        .map(|agent| Standing {
            agent_id: agent.id().to_string(),
            personality: agent.personality().describe(),
            cumulative_votes: controller.cumulative_votes(agent.id()),
        })
        .collect();

    RunSummary {
        event_log: settings.event_log.clone(),
        report,
        standings,
        post_mortems: controller.post_mortems().to_vec(),
    }
}

fn report_results(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    print_summary(summary);
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// One run per log file; refuse to append a second run to an existing log
fn ensure_fresh_log(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => bail!(
            "Event log {} already holds a run; choose another path with --event-log",
            path.display()
        ),
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("Failed to inspect event log: {}", path.display())),
    }
}

/// Agents `agent_0..agent_{n-1}`, each with a personality seeded from its id
fn spawn_roster(settings: &Settings, generator: &mut PersonalityGenerator) -> Result<Roster> {
    let mut roster = Roster::new(settings.memory_window)?;

    for i in 0..settings.num_agents {
        let agent_id = format!("agent_{}", i);
        let personality = generator.generate(Some(&agent_id));
        roster.register(Agent::new(agent_id, personality, settings.memory_window)?)?;
    }

    Ok(roster)
}

// ============================================================================
// LEVEL 4 - FORMATTING
// ============================================================================

fn print_summary(summary: &RunSummary) {
    println!("\n=== Tournament Complete ===");
    println!("Rounds played: {}", summary.report.rounds_played);
    println!("Event log: {}", summary.event_log.display());

    println!("\nEliminations:");
    for elimination in &summary.report.eliminations {
        println!(
            "  Round {:>3}: {} ({} votes{})",
            elimination.round_number,
            elimination.result.eliminated_agent_id,
            elimination.result.cumulative_votes,
            if elimination.result.was_tie { ", tie" } else { "" }
        );
    }

    println!("\nFinal roster:");
    for standing in &summary.standings {
        println!(
            "  {:<12} {:>4} votes  {}",
            standing.agent_id, standing.cumulative_votes, standing.personality
        );
    }
}
