//! Post-mortem records - what an agent looked like when it was eliminated
//!
//! Observational only. Nothing reads these back into generation.

use gauntlet_core::Personality;
use serde::{Deserialize, Serialize};

/// Immutable snapshot taken just before an agent is replaced
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMortemRecord {
    pub agent_id: String,
    pub personality: Personality,
    pub rounds_survived: u32,
    pub total_votes_received: u32,
    pub elimination_round: u32,
    pub was_tie: bool,
}
