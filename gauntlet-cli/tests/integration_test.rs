//! Integration tests for the GAUNTLET arena
//!
//! Tests the full stack: roster, rounds, voting, elimination, replacement,
//! event logging and replay

use std::fs;
use std::io::Write;
use std::path::Path;

use gauntlet_core::{Agent, Roster, RoundSession};
use gauntlet_evolve::{PersonalityGenerator, ReplacementCoordinator};
use gauntlet_observe::{ArenaEvent, EventLog, LoggedEvent, ReplayEngine, ReplayError};
use gauntlet_tournament::{
    run_schedule, ArenaConfig, ArenaController, ArenaError, Ballot, Schedule, SeededBallots, VoteError,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tempfile::TempDir;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn seeded_roster(n: usize, seed: u64) -> (Roster, PersonalityGenerator) {
    let mut generator = PersonalityGenerator::new(seed);
    let mut roster = Roster::default();
    for i in 0..n {
        let id = format!("agent_{}", i);
        let personality = generator.generate(Some(&id));
        roster.register(Agent::new(id, personality, 5).unwrap()).unwrap();
    }
    (roster, generator)
}

fn logged_controller(n: usize, seed: u64, path: &Path) -> ArenaController {
    let (roster, generator) = seeded_roster(n, seed);
    ArenaController::new(roster, ArenaConfig::default().with_seed(seed))
        .with_replacement(ReplacementCoordinator::new(generator))
        .with_event_log(EventLog::open(path).unwrap())
        .unwrap()
}

fn prompts(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Prompt number {}", i + 1)).collect()
}

fn read_events(path: &Path) -> Vec<ArenaEvent> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| LoggedEvent::from_line(line).unwrap().event)
        .collect()
}

// ============================================================================
// FULL CYCLE
// ============================================================================

#[test]
fn test_full_tournament_replays_to_same_tallies() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.jsonl");

    let mut controller = logged_controller(6, 42, &path);
    let schedule = Schedule::new(prompts(6)).with_rounds_per_elimination(2);
    let report = run_schedule(&mut controller, &schedule, &mut SeededBallots::new(42)).unwrap();

    assert_eq!(report.rounds_played, 6);
    assert_eq!(report.eliminations.len(), 3);
    assert_eq!(controller.agent_count(), 6);

    let summaries = ReplayEngine::open(&path).unwrap().replay().unwrap();
    assert_eq!(summaries.len(), 6);

    for summary in &summaries {
        let voting = controller.voting_round(summary.round_number).unwrap();
        assert_eq!(summary.vote_counts, voting.vote_counts());
        assert_eq!(summary.num_votes, voting.total_votes());
        assert_eq!(summary.num_responses, 6);
        assert_eq!(summary.was_elimination_round(), summary.round_number % 2 == 0);
    }

    let eliminated: Vec<&str> = summaries
        .iter()
        .filter_map(|s| s.eliminated_agent_id.as_deref())
        .collect();
    let expected: Vec<&str> = report
        .eliminations
        .iter()
        .map(|e| e.result.eliminated_agent_id.as_str())
        .collect();
    assert_eq!(eliminated, expected);
}

#[test]
fn test_same_seed_same_run() {
    let dir = TempDir::new().unwrap();
    let first_path = dir.path().join("first.jsonl");
    let second_path = dir.path().join("second.jsonl");
    let schedule = Schedule::new(prompts(4)).with_rounds_per_elimination(1);

    let mut first = logged_controller(5, 7, &first_path);
    let first_report = run_schedule(&mut first, &schedule, &mut SeededBallots::new(7)).unwrap();

    let mut second = logged_controller(5, 7, &second_path);
    let second_report = run_schedule(&mut second, &schedule, &mut SeededBallots::new(7)).unwrap();

    assert_eq!(first_report, second_report);
    assert_eq!(first.post_mortems(), second.post_mortems());
    // Timestamps differ; events must not
    assert_eq!(read_events(&first_path), read_events(&second_path));
}

#[test]
fn test_event_order_within_round() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.jsonl");

    let mut controller = logged_controller(3, 1, &path);
    let schedule = Schedule::new(prompts(1)).with_rounds_per_elimination(1);
    run_schedule(&mut controller, &schedule, &mut SeededBallots::new(1)).unwrap();

    let types: Vec<&str> = read_events(&path).iter().map(ArenaEvent::event_type).collect();
    assert_eq!(
        types,
        vec![
            "ArenaInitialized",
            "RoundStarted",
            "AgentResponded",
            "AgentResponded",
            "AgentResponded",
            "VoteCast",
            "VoteCast",
            "VoteCast",
            "VoteSummary",
            "EliminationDecided",
            "AgentReplaced",
        ]
    );
}

#[test]
fn test_replacement_keeps_identity_and_changes_personality() {
    let (roster, generator) = seeded_roster(4, 3);
    let before = *roster.get("agent_2").unwrap().personality();
    let mut controller =
        ArenaController::new(roster, ArenaConfig::default()).with_replacement(ReplacementCoordinator::new(generator));

    let session = controller.start_round("Who goes?").unwrap();
    let ballot: Ballot = session
        .participants()
        .into_iter()
        .map(|voter| {
            let target = if voter == "agent_2" { "agent_0" } else { "agent_2" };
            (voter, target.to_string())
        })
        .collect();
    controller.conduct_voting(&session, &ballot).unwrap();

    let elimination = controller.resolve_elimination().unwrap();
    assert_eq!(elimination.eliminated_agent_id, "agent_2");

    let replacement = controller.execute_replacement(&elimination).unwrap().unwrap();
    assert_eq!(replacement.id(), "agent_2");
    assert_ne!(*replacement.personality(), before);

    let record = &controller.post_mortems()[0];
    assert_eq!(record.agent_id, "agent_2");
    assert_eq!(record.personality, before);
    assert_eq!(record.total_votes_received, 3);
}

#[test]
fn test_random_ballots_conserve_votes() {
    let (roster, _) = seeded_roster(7, 11);
    let mut controller = ArenaController::new(roster, ArenaConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    // Voters abstain at random; everyone else picks a random other participant
    let mut ballots = |session: &RoundSession| -> Ballot {
        let participants = session.participants();
        let mut ballot = Ballot::new();
        for voter in &participants {
            let others: Vec<&String> = participants.iter().filter(|p| *p != voter).collect();
            if rand::Rng::gen_bool(&mut rng, 0.7) {
                if let Some(target) = others.choose(&mut rng) {
                    ballot.insert(voter.clone(), (*target).clone());
                }
            }
        }
        ballot
    };

    let schedule = Schedule::new(prompts(5)).with_rounds_per_elimination(10);
    run_schedule(&mut controller, &schedule, &mut ballots).unwrap();

    let total_cast: usize = controller.voting_history().iter().map(|v| v.total_votes()).sum();
    let total_received: u32 = controller
        .roster()
        .ids()
        .iter()
        .map(|id| controller.cumulative_votes(id))
        .sum();
    assert_eq!(total_received as usize, total_cast);
}

// ============================================================================
// FAILURE PATHS
// ============================================================================

#[test]
fn test_invalid_ballot_writes_no_vote_events() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.jsonl");
    let mut controller = logged_controller(3, 5, &path);

    let session = controller.start_round("p").unwrap();
    let before = controller.event_log().unwrap().appended();

    let mut ballot = Ballot::new();
    ballot.insert("agent_0".to_string(), "agent_1".to_string());
    ballot.insert("agent_1".to_string(), "nobody".to_string());

    let err = controller.conduct_voting(&session, &ballot).unwrap_err();
    assert!(matches!(err, ArenaError::Vote(VoteError::InvalidVoteTarget { .. })));
    assert_eq!(controller.event_log().unwrap().appended(), before);
}

#[test]
fn test_replay_missing_file() {
    let dir = TempDir::new().unwrap();
    match ReplayEngine::open(dir.path().join("missing.jsonl")) {
        Err(ReplayError::Io(err)) => assert_eq!(err.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_replay_rejects_malformed_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.jsonl");

    let mut controller = logged_controller(3, 9, &path);
    controller.start_round("p").unwrap();
    drop(controller);

    let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
    writeln!(file, "{{ this is not json").unwrap();

    match ReplayEngine::open(&path).unwrap().replay() {
        Err(ReplayError::Parse { line, .. }) => assert_eq!(line, 6),
        other => panic!("expected parse error, got {:?}", other.map(|r| r.len())),
    }
}

#[test]
fn test_replay_rejects_out_of_order_events() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.jsonl");
    let target = dir.path().join("broken.jsonl");

    let mut controller = logged_controller(3, 2, &source);
    controller.start_round("p").unwrap();
    drop(controller);

    // Drop the RoundStarted line so responses precede their round
    let kept: Vec<String> = fs::read_to_string(&source)
        .unwrap()
        .lines()
        .filter(|line| !line.contains("\"RoundStarted\""))
        .map(str::to_string)
        .collect();
    fs::write(&target, kept.join("\n")).unwrap();

    let err = ReplayEngine::open(&target).unwrap().replay().unwrap_err();
    assert!(matches!(err, ReplayError::Inconsistency(_)));
}
