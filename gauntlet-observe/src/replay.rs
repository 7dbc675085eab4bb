//! Deterministic replay
//!
//! Rebuilds per-round summaries from an event log in a single pass. Every
//! round-scoped event must follow the `RoundStarted` of its round; the
//! first violation aborts the replay with `ReplayError::Inconsistency`
//! and no partial result is returned.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ReplayError;
use crate::events::{ArenaEvent, LoggedEvent};

/// What the log says happened in one round
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub round_number: u32,
    pub prompt: String,
    pub num_responses: usize,
    pub num_votes: usize,
    pub vote_counts: BTreeMap<String, u32>,
    pub eliminated_agent_id: Option<String>,
    /// Identities reinstated with a new personality in this round
    pub replaced_agent_ids: Vec<String>,
}

impl RoundSummary {
    fn started(round_number: u32, prompt: String) -> Self {
        Self {
            round_number,
            prompt,
            num_responses: 0,
            num_votes: 0,
            vote_counts: BTreeMap::new(),
            eliminated_agent_id: None,
            replaced_agent_ids: Vec::new(),
        }
    }

    pub fn was_elimination_round(&self) -> bool {
        self.eliminated_agent_id.is_some()
    }
}

/// Full result of replaying a log
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplayLog {
    /// Roster announced by `ArenaInitialized`, if the log has one
    pub initial_agents: Option<Vec<String>>,
    /// Summaries ordered by round number
    pub rounds: Vec<RoundSummary>,
    pub events_read: usize,
    /// Rounds with more than one `VoteSummary`; the last one was kept
    pub duplicate_summaries: Vec<u32>,
}

#[derive(Default)]
struct ReplayState {
    initial_agents: Option<Vec<String>>,
    rounds: BTreeMap<u32, RoundSummary>,
    summarized: BTreeSet<u32>,
    duplicate_summaries: Vec<u32>,
    events_read: usize,
}

impl ReplayState {
    fn apply(&mut self, event: ArenaEvent) -> Result<(), ReplayError> {
        self.events_read += 1;

        match event {
            ArenaEvent::ArenaInitialized { agent_ids, .. } => {
                if self.initial_agents.is_some() {
                    return Err(ReplayError::Inconsistency(
                        "arena initialized more than once".to_string(),
                    ));
                }
                self.initial_agents = Some(agent_ids);
            }
            ArenaEvent::RoundStarted { round_number, prompt } => {
                if self.rounds.contains_key(&round_number) {
                    return Err(ReplayError::Inconsistency(format!(
                        "round {} started twice",
                        round_number
                    )));
                }
                self.rounds.insert(round_number, RoundSummary::started(round_number, prompt));
            }
            ArenaEvent::AgentResponded { round_number, .. } => {
                self.round_mut(round_number, "response")?.num_responses += 1;
            }
            ArenaEvent::VoteCast { round_number, .. } => {
                self.round_mut(round_number, "vote")?.num_votes += 1;
            }
            ArenaEvent::VoteSummary { round_number, vote_counts } => {
                self.round_mut(round_number, "vote summary")?.vote_counts = vote_counts;
                if !self.summarized.insert(round_number) {
                    tracing::warn!("Round {} has more than one vote summary; keeping the last", round_number);
                    self.duplicate_summaries.push(round_number);
                }
            }
            ArenaEvent::EliminationDecided {
                round_number,
                eliminated_agent_id,
                ..
            } => {
                self.round_mut(round_number, "elimination")?.eliminated_agent_id = Some(eliminated_agent_id);
            }
            ArenaEvent::AgentReplaced { round_number, agent_id, .. } => {
                self.round_mut(round_number, "replacement")?.replaced_agent_ids.push(agent_id);
            }
        }

        Ok(())
    }

    fn round_mut(&mut self, round_number: u32, what: &str) -> Result<&mut RoundSummary, ReplayError> {
        self.rounds.get_mut(&round_number).ok_or_else(|| {
            ReplayError::Inconsistency(format!("{} before start of round {}", what, round_number))
        })
    }

    fn finish(self) -> ReplayLog {
        ReplayLog {
            initial_agents: self.initial_agents,
            rounds: self.rounds.into_values().collect(),
            events_read: self.events_read,
            duplicate_summaries: self.duplicate_summaries,
        }
    }
}

/// Replay events already in memory
pub fn replay_events<I>(events: I) -> Result<ReplayLog, ReplayError>
where
    I: IntoIterator<Item = ArenaEvent>,
{
    let mut state = ReplayState::default();
    for event in events {
        state.apply(event)?;
    }
    Ok(state.finish())
}

/// Read-only replayer over a log file
#[derive(Clone, Debug)]
pub struct ReplayEngine {
    path: PathBuf,
}

impl ReplayEngine {
    /// Bind to an existing log file
    ///
    /// # Errors
    /// `ReplayError::Io` (kind `NotFound`) if the file does not exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref().to_path_buf();
        fs::metadata(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Round summaries ordered by round number
    pub fn replay(&self) -> Result<Vec<RoundSummary>, ReplayError> {
        self.replay_log().map(|log| log.rounds)
    }

    /// Replay the whole log, including run-level information
    pub fn replay_log(&self) -> Result<ReplayLog, ReplayError> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut state = ReplayState::default();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let logged = LoggedEvent::from_line(line).map_err(|source| ReplayError::Parse {
                line: index + 1,
                source,
            })?;
            tracing::debug!("Replaying {} from line {}", logged.event.event_type(), index + 1);
            state.apply(logged.event)?;
        }

        Ok(state.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_log(dir: &TempDir, lines: &[&str]) -> PathBuf {
        let path = dir.path().join("test.log");
        let mut file = File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    #[test]
    fn test_replay_simple_round() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            &dir,
            &[
                r#"{"event_type": "RoundStarted", "data": {"round_number": 1, "prompt": "Test", "timestamp": "2024-01-01T00:00:00"}}"#,
                r#"{"event_type": "AgentResponded", "data": {"round_number": 1, "agent_id": "agent_1", "response": "Response", "timestamp": "2024-01-01T00:00:01"}}"#,
                r#"{"event_type": "VoteSummary", "data": {"round_number": 1, "vote_counts": {"agent_1": 0}, "timestamp": "2024-01-01T00:00:02"}}"#,
            ],
        );

        let summaries = ReplayEngine::open(&path).unwrap().replay().unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].round_number, 1);
        assert_eq!(summaries[0].prompt, "Test");
        assert_eq!(summaries[0].num_responses, 1);
        assert_eq!(summaries[0].vote_counts.get("agent_1"), Some(&0));
        assert!(!summaries[0].was_elimination_round());
    }

    #[test]
    fn test_replay_with_elimination() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            &dir,
            &[
                r#"{"event_type": "RoundStarted", "data": {"round_number": 1, "prompt": "Test", "timestamp": "2024-01-01T00:00:00"}}"#,
                r#"{"event_type": "VoteSummary", "data": {"round_number": 1, "vote_counts": {"agent_1": 5}, "timestamp": "2024-01-01T00:00:01"}}"#,
                r#"{"event_type": "EliminationDecided", "data": {"round_number": 1, "eliminated_agent_id": "agent_1", "cumulative_votes": 5, "was_tie": false, "timestamp": "2024-01-01T00:00:02"}}"#,
            ],
        );

        let summaries = ReplayEngine::open(&path).unwrap().replay().unwrap();

        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].was_elimination_round());
        assert_eq!(summaries[0].eliminated_agent_id.as_deref(), Some("agent_1"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = ReplayEngine::open(dir.path().join("absent.log")).unwrap_err();
        match err {
            ReplayError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_vote_before_round_start_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            &dir,
            &[
                r#"{"event_type": "VoteCast", "data": {"round_number": 1, "voter_id": "agent_1", "voted_for_id": "agent_2", "timestamp": "2024-01-01T00:00:00"}}"#,
            ],
        );

        let err = ReplayEngine::open(&path).unwrap().replay().unwrap_err();
        assert!(matches!(err, ReplayError::Inconsistency(_)));
    }

    #[test]
    fn test_duplicate_round_start_fails() {
        let events = vec![
            ArenaEvent::RoundStarted {
                round_number: 1,
                prompt: "a".to_string(),
            },
            ArenaEvent::RoundStarted {
                round_number: 1,
                prompt: "b".to_string(),
            },
        ];
        assert!(matches!(replay_events(events), Err(ReplayError::Inconsistency(_))));
    }

    #[test]
    fn test_inconsistency_aborts_without_partial_result() {
        // Round 1 is fine, round 2 has a response before its start
        let events = vec![
            ArenaEvent::RoundStarted {
                round_number: 1,
                prompt: "p".to_string(),
            },
            ArenaEvent::AgentResponded {
                round_number: 2,
                agent_id: "a".to_string(),
                response: "r".to_string(),
            },
        ];
        let err = replay_events(events).unwrap_err();
        assert!(err.to_string().contains("round 2"));
    }

    #[test]
    fn test_elimination_and_replacement_require_round() {
        let elimination = ArenaEvent::EliminationDecided {
            round_number: 3,
            eliminated_agent_id: "a".to_string(),
            cumulative_votes: 1,
            was_tie: false,
        };
        let replacement = ArenaEvent::AgentReplaced {
            round_number: 3,
            agent_id: "a".to_string(),
            old_personality: BTreeMap::new(),
            new_personality: BTreeMap::new(),
        };
        assert!(replay_events(vec![elimination]).is_err());
        assert!(replay_events(vec![replacement]).is_err());
    }

    #[test]
    fn test_second_summary_after_empty_one_is_flagged() {
        let mut counts = BTreeMap::new();
        counts.insert("a".to_string(), 2);
        let events = vec![
            ArenaEvent::RoundStarted {
                round_number: 1,
                prompt: "p".to_string(),
            },
            ArenaEvent::VoteSummary {
                round_number: 1,
                vote_counts: BTreeMap::new(),
            },
            ArenaEvent::VoteSummary {
                round_number: 1,
                vote_counts: counts.clone(),
            },
        ];

        let log = replay_events(events).unwrap();
        assert_eq!(log.duplicate_summaries, vec![1]);
        assert_eq!(log.rounds[0].vote_counts, counts);
    }

    #[test]
    fn test_single_summary_not_flagged() {
        let events = vec![
            ArenaEvent::RoundStarted {
                round_number: 1,
                prompt: "p".to_string(),
            },
            ArenaEvent::VoteSummary {
                round_number: 1,
                vote_counts: BTreeMap::new(),
            },
        ];
        assert!(replay_events(events).unwrap().duplicate_summaries.is_empty());
    }

    #[test]
    fn test_summaries_ordered_by_round_number() {
        let events = vec![
            ArenaEvent::RoundStarted {
                round_number: 2,
                prompt: "second".to_string(),
            },
            ArenaEvent::RoundStarted {
                round_number: 1,
                prompt: "first".to_string(),
            },
        ];
        let log = replay_events(events).unwrap();
        let rounds: Vec<u32> = log.rounds.iter().map(|r| r.round_number).collect();
        assert_eq!(rounds, vec![1, 2]);
        assert_eq!(log.events_read, 2);
    }

    #[test]
    fn test_initialization_and_replacement_recorded() {
        let events = vec![
            ArenaEvent::ArenaInitialized {
                num_agents: 3,
                agent_ids: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                settings: BTreeMap::new(),
            },
            ArenaEvent::RoundStarted {
                round_number: 1,
                prompt: "p".to_string(),
            },
            ArenaEvent::AgentReplaced {
                round_number: 1,
                agent_id: "b".to_string(),
                old_personality: BTreeMap::new(),
                new_personality: BTreeMap::new(),
            },
        ];
        let log = replay_events(events).unwrap();
        assert_eq!(log.initial_agents.as_ref().map(Vec::len), Some(3));
        assert_eq!(log.rounds[0].replaced_agent_ids, vec!["b".to_string()]);
    }

    #[test]
    fn test_blank_lines_skipped_and_bad_json_reports_line() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            &dir,
            &[
                r#"{"event_type": "RoundStarted", "data": {"round_number": 1, "prompt": "p", "timestamp": "t"}}"#,
                "",
                "not json",
            ],
        );

        let err = ReplayEngine::open(&path).unwrap().replay().unwrap_err();
        match err {
            ReplayError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
