//! Elimination resolution
//!
//! The agent with the most cumulative votes received is eliminated.
//! Ties are broken, in order, by:
//! 1. Lowest historical average votes per round
//! 2. Lowest `stable_hash(agent_id) ^ seed`, then agent id
//!
//! Every step is a pure function of the candidates and the seed, so the
//! same inputs pick the same agent in any process.

use std::cmp::Ordering;

use gauntlet_core::stable_hash;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EliminationError {
    #[error("Cannot resolve an elimination with no candidates")]
    NoCandidates,
}

/// An agent under consideration, with its standing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EliminationCandidate {
    pub agent_id: String,
    /// Votes received across all completed voting rounds
    pub cumulative_votes: u32,
    /// Mean votes received per completed voting round
    pub historical_average: f64,
}

impl EliminationCandidate {
    pub fn new(agent_id: impl Into<String>, cumulative_votes: u32, historical_average: f64) -> Self {
        Self {
            agent_id: agent_id.into(),
            cumulative_votes,
            historical_average,
        }
    }
}

/// Outcome of an elimination decision
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationResult {
    pub eliminated_agent_id: String,
    pub cumulative_votes: u32,
    /// More than one candidate shared the top cumulative score
    pub was_tie: bool,
}

/// Pick exactly one candidate to eliminate.
///
/// # Arguments
/// * `candidates` - Every agent eligible for elimination
/// * `seed` - Mixed into the final tie-break key
///
/// # Errors
/// `NoCandidates` if `candidates` is empty
pub fn resolve_elimination(
    candidates: &[EliminationCandidate],
    seed: u64,
) -> Result<EliminationResult, EliminationError> {
    let max_votes = candidates
        .iter()
        .map(|c| c.cumulative_votes)
        .max()
        .ok_or(EliminationError::NoCandidates)?;

    let tied: Vec<&EliminationCandidate> = candidates
        .iter()
        .filter(|c| c.cumulative_votes == max_votes)
        .collect();
    let was_tie = tied.len() > 1;

    let eliminated = if was_tie { break_tie(&tied, seed) } else { Some(tied[0]) };
    let eliminated = eliminated.ok_or(EliminationError::NoCandidates)?;

    Ok(EliminationResult {
        eliminated_agent_id: eliminated.agent_id.clone(),
        cumulative_votes: eliminated.cumulative_votes,
        was_tie,
    })
}

/// Narrow by lowest historical average, then by the seeded hash key
fn break_tie<'a>(tied: &[&'a EliminationCandidate], seed: u64) -> Option<&'a EliminationCandidate> {
    let min_avg = tied
        .iter()
        .map(|c| c.historical_average)
        .fold(f64::INFINITY, f64::min);

    let avg_tied: Vec<&EliminationCandidate> = tied
        .iter()
        .copied()
        .filter(|c| c.historical_average == min_avg)
        .collect();

    if avg_tied.len() == 1 {
        return Some(avg_tied[0]);
    }

    avg_tied.into_iter().min_by(|a, b| compare_tie_keys(a, b, seed))
}

fn compare_tie_keys(a: &EliminationCandidate, b: &EliminationCandidate, seed: u64) -> Ordering {
    tie_break_key(&a.agent_id, seed)
        .cmp(&tie_break_key(&b.agent_id, seed))
        .then_with(|| a.agent_id.cmp(&b.agent_id))
}

/// Final tie-break ordering key; lowest is eliminated
pub fn tie_break_key(agent_id: &str, seed: u64) -> u64 {
    stable_hash(agent_id) ^ seed
}
