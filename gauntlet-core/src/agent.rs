//! Agent records - identity, personality and bounded round history

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::RosterError;
use crate::personality::Personality;

/// Rounds remembered per agent unless configured otherwise
pub const DEFAULT_HISTORY_WINDOW: usize = 5;

/// One round as seen by the agent that played it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub round_number: u32,
    pub prompt: String,
    pub response: String,
}

/// Sliding window over an agent's most recent rounds.
///
/// Holds at most `window` entries; pushing past that drops the oldest.
#[derive(Clone, Debug)]
pub struct AgentHistory {
    window: usize,
    entries: VecDeque<HistoryEntry>,
}

impl AgentHistory {
    pub fn new(window: usize) -> Result<Self, RosterError> {
        if window == 0 {
            return Err(RosterError::InvalidHistoryWindow(window));
        }
        Ok(Self {
            window,
            entries: VecDeque::with_capacity(window),
        })
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.window {
            self.entries.pop_front();
        }
    }

    /// Entries oldest first
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A tournament participant.
///
/// The identity is fixed for the lifetime of the record. The personality
/// never changes either; replacement builds a new record under the same
/// identity instead.
#[derive(Clone, Debug)]
pub struct Agent {
    id: String,
    personality: Personality,
    history: AgentHistory,
}

impl Agent {
    /// Create an agent with an empty history.
    ///
    /// # Errors
    /// `EmptyIdentity` for an empty id, `InvalidHistoryWindow` for a zero window.
    pub fn new(id: impl Into<String>, personality: Personality, history_window: usize) -> Result<Self, RosterError> {
        let id = id.into();
        if id.is_empty() {
            return Err(RosterError::EmptyIdentity);
        }
        let history = AgentHistory::new(history_window)?;

        tracing::debug!("Created agent '{}' ({})", id, personality.describe());

        Ok(Self {
            id,
            personality,
            history,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    pub fn history(&self) -> &AgentHistory {
        &self.history
    }

    /// Remember a round this agent just played
    pub fn record_round(&mut self, round_number: u32, prompt: &str, response: &str) {
        self.history.push(HistoryEntry {
            round_number,
            prompt: prompt.to_string(),
            response: response.to_string(),
        });
    }
}
