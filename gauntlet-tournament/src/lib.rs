//! GAUNTLET Tournament - Rounds, voting and elimination
//!
//! This crate runs the arena:
//! - Round sessions with one response per agent
//! - Peer voting with whole-ballot validation
//! - Cumulative elimination with deterministic tie-breaks
//! - Replacement of eliminated agents under the same identity
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_schedule (orchestration)
//! - Level 2: ArenaController phases (start_round, conduct_voting, resolve_elimination, execute_replacement)
//! - Level 3: collect_votes, aggregate_votes, resolve_elimination (steps)
//! - Level 4: utilities, configuration

mod config;
mod controller;
mod elimination;
mod responder;
mod schedule;
mod voting;

pub use config::{ArenaConfig, Schedule, MIN_PARTICIPANTS};
pub use controller::{ArenaController, ArenaError};
pub use elimination::{resolve_elimination, tie_break_key, EliminationCandidate, EliminationError, EliminationResult};
pub use responder::{truncate_chars, PlaceholderResponder, ResponseGenerator};
pub use schedule::{run_schedule, BallotSource, ScheduleReport, ScheduledElimination, SeededBallots};
pub use voting::{aggregate_votes, collect_votes, Ballot, Vote, VoteError, VoteTally, VotingRoundResult};
