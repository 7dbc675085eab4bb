//! Roster - identity-keyed store of the active agents
//!
//! Registration order is kept alongside the map because it defines the
//! order in which agents respond every round.

use rustc_hash::FxHashMap;

use crate::agent::{Agent, DEFAULT_HISTORY_WINDOW};
use crate::error::RosterError;

/// Owned registry of agents for one tournament run
#[derive(Clone, Debug)]
pub struct Roster {
    history_window: usize,
    order: Vec<String>,
    agents: FxHashMap<String, Agent>,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            order: Vec::new(),
            agents: FxHashMap::default(),
        }
    }
}

impl Roster {
    /// Create an empty roster whose agents remember `history_window` rounds
    pub fn new(history_window: usize) -> Result<Self, RosterError> {
        if history_window == 0 {
            return Err(RosterError::InvalidHistoryWindow(history_window));
        }
        Ok(Self {
            history_window,
            ..Default::default()
        })
    }

    /// History window applied to agents created for this roster
    pub fn history_window(&self) -> usize {
        self.history_window
    }

    /// Add an agent at the end of the registration order.
    ///
    /// The agent's history window must match the roster's.
    pub fn register(&mut self, agent: Agent) -> Result<(), RosterError> {
        if self.agents.contains_key(agent.id()) {
            return Err(RosterError::DuplicateIdentity(agent.id().to_string()));
        }
        if agent.history().window() != self.history_window {
            return Err(RosterError::HistoryWindowMismatch {
                agent_id: agent.id().to_string(),
                expected: self.history_window,
                actual: agent.history().window(),
            });
        }

        let id = agent.id().to_string();
        tracing::info!("Registered agent '{}'", id);
        self.order.push(id.clone());
        self.agents.insert(id, agent);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&Agent, RosterError> {
        self.agents
            .get(id)
            .ok_or_else(|| RosterError::IdentityNotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut Agent, RosterError> {
        self.agents
            .get_mut(id)
            .ok_or_else(|| RosterError::IdentityNotFound(id.to_string()))
    }

    /// Remove an agent and hand back its record
    pub fn remove(&mut self, id: &str) -> Result<Agent, RosterError> {
        let agent = self
            .agents
            .remove(id)
            .ok_or_else(|| RosterError::IdentityNotFound(id.to_string()))?;
        self.order.retain(|existing| existing != id);

        tracing::info!("Removed agent '{}'", id);
        Ok(agent)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.agents.contains_key(id)
    }

    /// Identities in registration order
    pub fn ids(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Agents in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.order.iter().filter_map(move |id| self.agents.get(id))
    }

    pub fn count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        let count = self.order.len();
        self.order.clear();
        self.agents.clear();
        tracing::info!("Cleared {} agents from roster", count);
    }
}
