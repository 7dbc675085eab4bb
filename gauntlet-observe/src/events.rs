//! Event schemas
//!
//! On disk every event is one JSON object with exactly two keys:
//! `event_type` (the variant name) and `data` (the variant's fields plus
//! a `timestamp`). The timestamp is stamped by the log at write time, so
//! it lives on `LoggedEvent` rather than on each variant.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One externally visible arena step
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", content = "data")]
pub enum ArenaEvent {
    ArenaInitialized {
        num_agents: usize,
        agent_ids: Vec<String>,
        settings: BTreeMap<String, Value>,
    },
    RoundStarted {
        round_number: u32,
        prompt: String,
    },
    AgentResponded {
        round_number: u32,
        agent_id: String,
        response: String,
    },
    VoteCast {
        round_number: u32,
        voter_id: String,
        voted_for_id: String,
    },
    VoteSummary {
        round_number: u32,
        vote_counts: BTreeMap<String, u32>,
    },
    EliminationDecided {
        round_number: u32,
        eliminated_agent_id: String,
        cumulative_votes: u32,
        was_tie: bool,
    },
    AgentReplaced {
        round_number: u32,
        agent_id: String,
        old_personality: BTreeMap<String, String>,
        new_personality: BTreeMap<String, String>,
    },
}

impl ArenaEvent {
    /// Wire name of the event, as written to `event_type`
    pub fn event_type(&self) -> &'static str {
        match self {
            ArenaEvent::ArenaInitialized { .. } => "ArenaInitialized",
            ArenaEvent::RoundStarted { .. } => "RoundStarted",
            ArenaEvent::AgentResponded { .. } => "AgentResponded",
            ArenaEvent::VoteCast { .. } => "VoteCast",
            ArenaEvent::VoteSummary { .. } => "VoteSummary",
            ArenaEvent::EliminationDecided { .. } => "EliminationDecided",
            ArenaEvent::AgentReplaced { .. } => "AgentReplaced",
        }
    }

    /// Round the event belongs to; `None` for run-level events
    pub fn round_number(&self) -> Option<u32> {
        match self {
            ArenaEvent::ArenaInitialized { .. } => None,
            ArenaEvent::RoundStarted { round_number, .. }
            | ArenaEvent::AgentResponded { round_number, .. }
            | ArenaEvent::VoteCast { round_number, .. }
            | ArenaEvent::VoteSummary { round_number, .. }
            | ArenaEvent::EliminationDecided { round_number, .. }
            | ArenaEvent::AgentReplaced { round_number, .. } => Some(*round_number),
        }
    }
}

/// An event together with the time it was written
#[derive(Clone, Debug, PartialEq)]
pub struct LoggedEvent {
    pub event: ArenaEvent,
    /// ISO-8601 / RFC 3339 UTC timestamp
    pub timestamp: String,
}

#[derive(Serialize)]
struct Line<'a> {
    event_type: &'a str,
    data: Value,
}

impl LoggedEvent {
    pub fn new(event: ArenaEvent, timestamp: impl Into<String>) -> Self {
        Self {
            event,
            timestamp: timestamp.into(),
        }
    }

    /// Render as a single JSON line (no trailing newline)
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut data = match serde_json::to_value(&self.event)? {
            Value::Object(mut tagged) => tagged.remove("data").unwrap_or_else(|| Value::Object(Default::default())),
            other => other,
        };
        if let Value::Object(fields) = &mut data {
            fields.insert("timestamp".to_string(), Value::String(self.timestamp.clone()));
        }

        serde_json::to_string(&Line {
            event_type: self.event.event_type(),
            data,
        })
    }

    /// Parse one JSON line. A missing timestamp parses as empty.
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(line)?;
        let timestamp = value
            .get("data")
            .and_then(|data| data.get("timestamp"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let event: ArenaEvent = serde_json::from_value(value)?;

        Ok(Self { event, timestamp })
    }
}
