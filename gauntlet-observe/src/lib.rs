//! GAUNTLET Observe - Event sourcing for tournament runs
//!
//! This crate provides the durable record of a run:
//! - Event types, one per externally visible arena step
//! - An append-only JSON-lines event log
//! - A replay engine that rebuilds round summaries from a log
//!
//! Replay never calls back into response generation or voting; it only
//! reads what was written.

mod error;
mod events;
mod log;
mod replay;

pub use error::{EventLogError, ReplayError};
pub use events::{ArenaEvent, LoggedEvent};
pub use log::EventLog;
pub use replay::{replay_events, ReplayEngine, ReplayLog, RoundSummary};
