//! Round sessions - one round's prompt and collected responses

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// What an agent is allowed to see when answering
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundContext {
    pub round_number: u32,
    pub prompt: String,
}

/// A single agent's answer in a round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub agent_id: String,
    pub response: String,
}

/// Accumulator for one round.
///
/// Open until `mark_complete` is called, after which no further
/// responses can be recorded.
#[derive(Clone, Debug)]
pub struct RoundSession {
    round_number: u32,
    prompt: String,
    responses: Vec<AgentResponse>,
    complete: bool,
}

impl RoundSession {
    pub fn new(round_number: u32, prompt: impl Into<String>) -> Self {
        Self {
            round_number,
            prompt: prompt.into(),
            responses: Vec::new(),
            complete: false,
        }
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn context(&self) -> RoundContext {
        RoundContext {
            round_number: self.round_number,
            prompt: self.prompt.clone(),
        }
    }

    /// Record a response; each agent may respond once per round
    pub fn add_response(&mut self, agent_id: &str, response: impl Into<String>) -> Result<(), SessionError> {
        if self.complete {
            return Err(SessionError::SessionClosed(self.round_number));
        }
        if self.has_responded(agent_id) {
            return Err(SessionError::DuplicateResponse {
                round: self.round_number,
                agent_id: agent_id.to_string(),
            });
        }

        self.responses.push(AgentResponse {
            agent_id: agent_id.to_string(),
            response: response.into(),
        });
        Ok(())
    }

    /// Close the session. Calling this again has no further effect.
    pub fn mark_complete(&mut self) {
        self.complete = true;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn responses(&self) -> &[AgentResponse] {
        &self.responses
    }

    /// Response text for `agent_id`, if it has answered yet
    pub fn response_for(&self, agent_id: &str) -> Option<&str> {
        self.responses
            .iter()
            .find(|r| r.agent_id == agent_id)
            .map(|r| r.response.as_str())
    }

    pub fn has_responded(&self, agent_id: &str) -> bool {
        self.responses.iter().any(|r| r.agent_id == agent_id)
    }

    /// Responding identities in response order
    pub fn participants(&self) -> Vec<String> {
        self.responses.iter().map(|r| r.agent_id.clone()).collect()
    }

    pub fn response_count(&self) -> usize {
        self.responses.len()
    }
}
