//! Scheduled runs
//!
//! Level 1 - Entry point
//!
//! Plays a list of prompts through a controller, voting after every round
//! and eliminating (then replacing) on the schedule's cadence.

use gauntlet_core::RoundSession;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::config::Schedule;
use crate::controller::{ArenaController, ArenaError};
use crate::elimination::EliminationResult;
use crate::voting::Ballot;

/// Supplies a ballot for each completed round
pub trait BallotSource {
    fn ballot(&mut self, session: &RoundSession) -> Ballot;
}

impl<F> BallotSource for F
where
    F: FnMut(&RoundSession) -> Ballot,
{
    fn ballot(&mut self, session: &RoundSession) -> Ballot {
        self(session)
    }
}

/// Every participant votes for a uniformly chosen other participant
pub struct SeededBallots {
    rng: ChaCha8Rng,
}

impl SeededBallots {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl BallotSource for SeededBallots {
    fn ballot(&mut self, session: &RoundSession) -> Ballot {
        let participants = session.participants();
        let mut ballot = Ballot::new();

        for voter in &participants {
            let others: Vec<&String> = participants.iter().filter(|id| *id != voter).collect();
            if let Some(target) = others.choose(&mut self.rng) {
                ballot.insert(voter.clone(), (*target).clone());
            }
        }

        ballot
    }
}

/// An elimination performed during a scheduled run
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScheduledElimination {
    pub round_number: u32,
    pub result: EliminationResult,
    pub replaced: bool,
}

/// What a scheduled run did
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleReport {
    pub rounds_played: u32,
    pub eliminations: Vec<ScheduledElimination>,
}

/// Play every prompt in `schedule` through `controller`.
///
/// # Errors
/// Stops at the first failing phase and returns its error; rounds already
/// played stay recorded in the controller and its event log.
pub fn run_schedule(
    controller: &mut ArenaController,
    schedule: &Schedule,
    ballots: &mut dyn BallotSource,
) -> Result<ScheduleReport, ArenaError> {
    let mut report = ScheduleReport::default();

    for prompt in &schedule.prompts {
        let session = controller.start_round(prompt)?;
        let ballot = ballots.ballot(&session);
        controller.conduct_voting(&session, &ballot)?;
        report.rounds_played += 1;

        if schedule.is_elimination_round(session.round_number()) {
            let result = controller.resolve_elimination()?;
            let replaced = controller.execute_replacement(&result)?.is_some();
            report.eliminations.push(ScheduledElimination {
                round_number: session.round_number(),
                result,
                replaced,
            });
        }
    }

    tracing::info!(
        "Schedule complete: {} rounds, {} eliminations",
        report.rounds_played,
        report.eliminations.len()
    );
    Ok(report)
}
