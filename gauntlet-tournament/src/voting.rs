//! Vote collection and aggregation
//!
//! Voting is single choice: each voter names exactly one other
//! participant of the round. A ballot is validated as a whole; one bad
//! entry rejects all of it.

use std::collections::BTreeMap;

use gauntlet_core::RoundSession;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Voter id -> target id for one round. Iterates in voter id order.
pub type Ballot = BTreeMap<String, String>;

/// Failures raised while validating a ballot
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoteError {
    #[error("Round {0} is not complete; voting requires every response first")]
    RoundIncomplete(u32),

    #[error("Agent '{0}' cannot vote for itself")]
    SelfVote(String),

    #[error("Vote target '{target}' did not take part in round {round}")]
    InvalidVoteTarget { round: u32, target: String },
}

/// A single validated vote
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter_id: String,
    pub voted_for_id: String,
    pub round_number: u32,
}

/// Votes received by one participant in one round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub agent_id: String,
    pub votes_received: u32,
}

/// Validated votes and per-participant tallies for a round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingRoundResult {
    pub round_number: u32,
    pub votes: Vec<Vote>,
    /// One entry per participant, ascending by agent id
    pub tallies: Vec<VoteTally>,
}

impl VotingRoundResult {
    /// Votes received by `agent_id` (0 if it was not a participant)
    pub fn votes_for(&self, agent_id: &str) -> u32 {
        self.tallies
            .iter()
            .find(|t| t.agent_id == agent_id)
            .map(|t| t.votes_received)
            .unwrap_or(0)
    }

    pub fn vote_counts(&self) -> BTreeMap<String, u32> {
        self.tallies
            .iter()
            .map(|t| (t.agent_id.clone(), t.votes_received))
            .collect()
    }

    pub fn total_votes(&self) -> usize {
        self.votes.len()
    }
}

/// Validate a ballot against a completed round.
///
/// # Errors
/// * `RoundIncomplete` - the session has not been marked complete
/// * `SelfVote` - any voter names itself
/// * `InvalidVoteTarget` - any target did not respond in this round
///
/// # Returns
/// Validated votes in ballot iteration order
pub fn collect_votes(session: &RoundSession, ballot: &Ballot) -> Result<Vec<Vote>, VoteError> {
    if !session.is_complete() {
        return Err(VoteError::RoundIncomplete(session.round_number()));
    }

    let participants: FxHashSet<&str> = session.responses().iter().map(|r| r.agent_id.as_str()).collect();
    let mut votes = Vec::with_capacity(ballot.len());

    for (voter_id, voted_for_id) in ballot {
        if voter_id == voted_for_id {
            return Err(VoteError::SelfVote(voter_id.clone()));
        }
        if !participants.contains(voted_for_id.as_str()) {
            return Err(VoteError::InvalidVoteTarget {
                round: session.round_number(),
                target: voted_for_id.clone(),
            });
        }

        votes.push(Vote {
            voter_id: voter_id.clone(),
            voted_for_id: voted_for_id.clone(),
            round_number: session.round_number(),
        });
    }

    Ok(votes)
}

/// Fold validated votes into per-participant counts.
///
/// Every participant appears exactly once, zero-vote participants
/// included. Tallies are ordered by agent id.
pub fn aggregate_votes(votes: &[Vote], round_number: u32, participants: &[String]) -> VotingRoundResult {
    let mut counts: BTreeMap<&str, u32> = participants.iter().map(|id| (id.as_str(), 0)).collect();

    for vote in votes {
        match counts.get_mut(vote.voted_for_id.as_str()) {
            Some(count) => *count += 1,
            None => tracing::warn!(
                "Dropping vote for '{}' in round {}: not a participant",
                vote.voted_for_id,
                round_number
            ),
        }
    }

    let tallies = counts
        .into_iter()
        .map(|(agent_id, votes_received)| VoteTally {
            agent_id: agent_id.to_string(),
            votes_received,
        })
        .collect();

    VotingRoundResult {
        round_number,
        votes: votes.to_vec(),
        tallies,
    }
}
