//! Error types for event logging and replay

use std::io;

/// Failure writing to the event log
#[derive(Debug, thiserror::Error)]
pub enum EventLogError {
    #[error("Event log I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Event serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure reconstructing a run from its event log
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("Event log I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed event on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Replay inconsistency: {0}")]
    Inconsistency(String),
}
