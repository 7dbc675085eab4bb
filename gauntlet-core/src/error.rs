//! Error types for roster and round-session contract violations

/// Failures raised by the roster and agent construction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("Agent identity cannot be empty")]
    EmptyIdentity,

    #[error("Agent '{0}' is already registered")]
    DuplicateIdentity(String),

    #[error("Agent '{0}' not found")]
    IdentityNotFound(String),

    #[error("History window must be at least 1, got {0}")]
    InvalidHistoryWindow(usize),

    #[error("Agent '{agent_id}' remembers {actual} rounds, but this roster keeps {expected}")]
    HistoryWindowMismatch {
        agent_id: String,
        expected: usize,
        actual: usize,
    },
}

/// Failures raised while recording responses into a round session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Agent '{agent_id}' already responded in round {round}")]
    DuplicateResponse { round: u32, agent_id: String },

    #[error("Round {0} is already complete")]
    SessionClosed(u32),
}
