//! GAUNTLET Core - Tournament data model
//!
//! This crate provides the state every other crate builds on:
//! - Personality traits (closed categorical enums plus a seed)
//! - Agent records with a bounded round history
//! - The roster (identity-keyed ownership store, registration ordered)
//! - Round sessions (one round's prompt and responses)
//! - A portable string hash for deterministic tie-breaking

pub mod agent;
pub mod error;
pub mod hash;
pub mod personality;
pub mod roster;
pub mod session;

// Re-exports for convenient access
pub use agent::{Agent, AgentHistory, HistoryEntry, DEFAULT_HISTORY_WINDOW};
pub use error::{RosterError, SessionError};
pub use hash::stable_hash;
pub use personality::{CommunicationStyle, EthicalStance, Personality, RiskTolerance, SocialStrategy};
pub use roster::Roster;
pub use session::{AgentResponse, RoundContext, RoundSession};
