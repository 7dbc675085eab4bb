//! Arena controller - round, voting, elimination and replacement
//!
//! Level 2 - Phases
//!
//! The controller is the only place that mutates the roster and round
//! sessions together. Every phase validates first and mutates second, so
//! a failed phase leaves state untouched and writes no event.

use std::collections::BTreeMap;

use gauntlet_core::{Agent, Roster, RosterError, RoundSession, SessionError};
use gauntlet_evolve::{PostMortemRecord, ReplacementCoordinator};
use gauntlet_observe::{ArenaEvent, EventLog, EventLogError};

use crate::config::ArenaConfig;
use crate::elimination::{resolve_elimination, EliminationCandidate, EliminationError, EliminationResult};
use crate::responder::{truncate_chars, PlaceholderResponder, ResponseGenerator};
use crate::voting::{aggregate_votes, collect_votes, Ballot, VoteError, VotingRoundResult};

/// Failures surfaced by arena phases
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error("Need at least {required} agents, but only {actual} registered")]
    InsufficientParticipants { required: usize, actual: usize },

    #[error("Cannot determine elimination without voting history")]
    NoVotingHistory,

    #[error("Round {0} was not played by this arena")]
    UnknownRound(u32),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Vote(#[from] VoteError),

    #[error(transparent)]
    Elimination(#[from] EliminationError),

    #[error(transparent)]
    EventLog(#[from] EventLogError),
}

/// Orchestrates a single tournament run
pub struct ArenaController {
    roster: Roster,
    config: ArenaConfig,
    responder: Box<dyn ResponseGenerator>,
    replacement: Option<ReplacementCoordinator>,
    event_log: Option<EventLog>,
    current_round: u32,
    round_history: Vec<RoundSession>,
    voting_history: Vec<VotingRoundResult>,
    cumulative_votes: BTreeMap<String, u32>,
}

impl ArenaController {
    /// Create a controller that owns `roster` and answers with placeholders
    pub fn new(roster: Roster, config: ArenaConfig) -> Self {
        tracing::info!("ArenaController initialized with {} agents", roster.count());

        Self {
            roster,
            config,
            responder: Box::new(PlaceholderResponder),
            replacement: None,
            event_log: None,
            current_round: 0,
            round_history: Vec::new(),
            voting_history: Vec::new(),
            cumulative_votes: BTreeMap::new(),
        }
    }

    /// Use `responder` to generate agent responses
    pub fn with_responder(mut self, responder: impl ResponseGenerator + 'static) -> Self {
        self.responder = Box::new(responder);
        self
    }

    /// Enable replacement of eliminated agents
    pub fn with_replacement(mut self, coordinator: ReplacementCoordinator) -> Self {
        self.replacement = Some(coordinator);
        self
    }

    /// Record every phase to `log`, starting with `ArenaInitialized`
    pub fn with_event_log(mut self, log: EventLog) -> Result<Self, ArenaError> {
        self.event_log = Some(log);
        let agent_ids = self.roster.ids();
        let mut settings = self.config.to_settings_map();
        settings.insert("history_window".to_string(), self.roster.history_window().into());

        self.emit(ArenaEvent::ArenaInitialized {
            num_agents: agent_ids.len(),
            agent_ids,
            settings,
        })?;
        Ok(self)
    }

    // ========================================================================
    // Rounds
    // ========================================================================

    /// Start the next round and collect a response from every agent.
    ///
    /// Agents answer in roster registration order. Each response is also
    /// appended to the answering agent's history.
    ///
    /// # Errors
    /// `InsufficientParticipants` if the roster is below the configured
    /// minimum; the round counter is not advanced.
    pub fn start_round(&mut self, prompt: &str) -> Result<RoundSession, ArenaError> {
        let actual = self.roster.count();
        if actual < self.config.min_participants {
            return Err(ArenaError::InsufficientParticipants {
                required: self.config.min_participants,
                actual,
            });
        }

        self.current_round += 1;
        let round_number = self.current_round;
        tracing::info!("Starting round {} with prompt: '{}...'", round_number, truncate_chars(prompt, 50));

        let mut session = RoundSession::new(round_number, prompt);
        let context = session.context();

        for agent_id in self.roster.ids() {
            tracing::debug!("Collecting response from agent '{}'", agent_id);

            let response = self.responder.generate(self.roster.get(&agent_id)?, &context);
            self.roster.get_mut(&agent_id)?.record_round(round_number, prompt, &response);
            session.add_response(&agent_id, response)?;
        }

        session.mark_complete();
        self.round_history.push(session.clone());

        self.emit(ArenaEvent::RoundStarted {
            round_number,
            prompt: prompt.to_string(),
        })?;
        for response in session.responses() {
            self.emit(ArenaEvent::AgentResponded {
                round_number,
                agent_id: response.agent_id.clone(),
                response: response.response.clone(),
            })?;
        }

        tracing::info!("Round {} complete with {} responses", round_number, session.response_count());
        Ok(session)
    }

    // ========================================================================
    // Voting
    // ========================================================================

    /// Validate `ballot` for `session`, tally it and fold it into the
    /// cumulative scores.
    ///
    /// # Errors
    /// * `UnknownRound` - `session` is not one this controller started, or
    ///   its participants differ from the recorded round
    /// * Any `VoteError` from validation
    ///
    /// Nothing is tallied when an error is returned.
    pub fn conduct_voting(&mut self, session: &RoundSession, ballot: &Ballot) -> Result<VotingRoundResult, ArenaError> {
        let recorded = self
            .round(session.round_number())
            .ok_or(ArenaError::UnknownRound(session.round_number()))?;
        if recorded.participants() != session.participants() {
            return Err(ArenaError::UnknownRound(session.round_number()));
        }

        let votes = collect_votes(session, ballot)?;
        let result = aggregate_votes(&votes, session.round_number(), &session.participants());

        for tally in &result.tallies {
            *self.cumulative_votes.entry(tally.agent_id.clone()).or_insert(0) += tally.votes_received;
        }
        self.voting_history.push(result.clone());

        for vote in &result.votes {
            self.emit(ArenaEvent::VoteCast {
                round_number: vote.round_number,
                voter_id: vote.voter_id.clone(),
                voted_for_id: vote.voted_for_id.clone(),
            })?;
        }
        self.emit(ArenaEvent::VoteSummary {
            round_number: result.round_number,
            vote_counts: result.vote_counts(),
        })?;

        tracing::info!(
            "Voting complete for round {}: {} votes cast",
            result.round_number,
            result.total_votes()
        );
        Ok(result)
    }

    // ========================================================================
    // Elimination and replacement
    // ========================================================================

    /// Decide which agent to eliminate from cumulative standings.
    ///
    /// # Errors
    /// `NoVotingHistory` if no voting round has completed yet.
    pub fn resolve_elimination(&mut self) -> Result<EliminationResult, ArenaError> {
        if self.voting_history.is_empty() {
            return Err(ArenaError::NoVotingHistory);
        }

        let candidates = self.elimination_candidates();
        let result = resolve_elimination(&candidates, self.config.random_seed)?;

        self.emit(ArenaEvent::EliminationDecided {
            round_number: self.current_round,
            eliminated_agent_id: result.eliminated_agent_id.clone(),
            cumulative_votes: result.cumulative_votes,
            was_tie: result.was_tie,
        })?;

        tracing::info!(
            "Elimination determined: '{}' with {} votes{}",
            result.eliminated_agent_id,
            result.cumulative_votes,
            if result.was_tie { " (tie)" } else { "" }
        );
        Ok(result)
    }

    /// Current standings of every rostered agent, in registration order
    pub fn elimination_candidates(&self) -> Vec<EliminationCandidate> {
        self.roster
            .ids()
            .into_iter()
            .map(|agent_id| {
                let cumulative = self.cumulative_votes(&agent_id);
                let average = self.historical_average(&agent_id);
                EliminationCandidate::new(agent_id, cumulative, average)
            })
            .collect()
    }

    /// Retire the eliminated agent and reinstate its identity.
    ///
    /// Does nothing (beyond a warning) when no replacement coordinator is
    /// configured. Cumulative votes for the identity carry over.
    ///
    /// # Returns
    /// The replacement agent, or `None` if replacement is disabled
    pub fn execute_replacement(&mut self, elimination: &EliminationResult) -> Result<Option<&Agent>, ArenaError> {
        let Some(coordinator) = self.replacement.as_mut() else {
            tracing::warn!(
                "No replacement coordinator configured; '{}' stays in the arena",
                elimination.eliminated_agent_id
            );
            return Ok(None);
        };

        let agent_id = elimination.eliminated_agent_id.as_str();
        let old_personality = *self.roster.get(agent_id)?.personality();
        let total_votes = self.cumulative_votes.get(agent_id).copied().unwrap_or(0);

        let new_personality = *coordinator
            .replace(
                &mut self.roster,
                agent_id,
                self.current_round,
                total_votes,
                self.current_round,
                elimination.was_tie,
            )?
            .personality();

        self.emit(ArenaEvent::AgentReplaced {
            round_number: self.current_round,
            agent_id: agent_id.to_string(),
            old_personality: old_personality.to_trait_map(),
            new_personality: new_personality.to_trait_map(),
        })?;

        Ok(Some(self.roster.get(agent_id)?))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn agent_count(&self) -> usize {
        self.roster.count()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Completed rounds, oldest first
    pub fn round_history(&self) -> &[RoundSession] {
        &self.round_history
    }

    pub fn round(&self, round_number: u32) -> Option<&RoundSession> {
        self.round_history.iter().find(|r| r.round_number() == round_number)
    }

    /// Completed voting rounds, oldest first
    pub fn voting_history(&self) -> &[VotingRoundResult] {
        &self.voting_history
    }

    pub fn voting_round(&self, round_number: u32) -> Option<&VotingRoundResult> {
        self.voting_history.iter().find(|v| v.round_number == round_number)
    }

    /// Votes received by `agent_id` across all voting rounds
    pub fn cumulative_votes(&self, agent_id: &str) -> u32 {
        self.cumulative_votes.get(agent_id).copied().unwrap_or(0)
    }

    /// Mean votes received per completed voting round (0.0 before any)
    pub fn historical_average(&self, agent_id: &str) -> f64 {
        if self.voting_history.is_empty() {
            return 0.0;
        }
        let total: u32 = self.voting_history.iter().map(|v| v.votes_for(agent_id)).sum();
        f64::from(total) / self.voting_history.len() as f64
    }

    /// Post-mortems recorded by the replacement coordinator, if any
    pub fn post_mortems(&self) -> &[PostMortemRecord] {
        self.replacement
            .as_ref()
            .map(ReplacementCoordinator::post_mortems)
            .unwrap_or(&[])
    }

    pub fn event_log(&self) -> Option<&EventLog> {
        self.event_log.as_ref()
    }

    fn emit(&mut self, event: ArenaEvent) -> Result<(), ArenaError> {
        if let Some(log) = self.event_log.as_mut() {
            log.append(event)?;
        }
        Ok(())
    }
}
