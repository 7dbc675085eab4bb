//! Replacement coordination
//!
//! Retires an eliminated agent and reinstates its identity with a fresh
//! personality and an empty history. The roster size is the same before
//! and after every replacement.

use gauntlet_core::{Agent, Roster, RosterError};

use crate::generator::PersonalityGenerator;
use crate::post_mortem::PostMortemRecord;

/// Owns the personality generator and the post-mortem archive
#[derive(Clone, Debug)]
pub struct ReplacementCoordinator {
    generator: PersonalityGenerator,
    post_mortems: Vec<PostMortemRecord>,
}

impl ReplacementCoordinator {
    pub fn new(generator: PersonalityGenerator) -> Self {
        Self {
            generator,
            post_mortems: Vec::new(),
        }
    }

    /// Replace `identity` in `roster`.
    ///
    /// Records a post-mortem from the current record, removes it, and
    /// registers a new record under the same identity. The new
    /// personality is guaranteed to differ from the retired one.
    ///
    /// # Errors
    /// `IdentityNotFound` if `identity` is not in the roster.
    ///
    /// # Returns
    /// The newly registered agent
    pub fn replace<'r>(
        &mut self,
        roster: &'r mut Roster,
        identity: &str,
        rounds_survived: u32,
        total_votes_received: u32,
        elimination_round: u32,
        was_tie: bool,
    ) -> Result<&'r Agent, RosterError> {
        let old_personality = *roster.get(identity)?.personality();

        self.post_mortems.push(PostMortemRecord {
            agent_id: identity.to_string(),
            personality: old_personality,
            rounds_survived,
            total_votes_received,
            elimination_round,
            was_tie,
        });
        tracing::debug!(
            "Post-mortem recorded for '{}': {} rounds, {} votes",
            identity,
            rounds_survived,
            total_votes_received
        );

        roster.remove(identity)?;

        let mut personality = self.generator.generate(Some(identity));
        while personality == old_personality {
            personality = self.generator.generate(Some(identity));
        }

        let replacement = Agent::new(identity, personality, roster.history_window())?;
        roster.register(replacement)?;

        tracing::info!(
            "Replaced agent '{}': old personality=[{}], new personality=[{}]",
            identity,
            old_personality,
            personality
        );

        roster.get(identity)
    }

    /// Every post-mortem recorded so far, oldest first
    pub fn post_mortems(&self) -> &[PostMortemRecord] {
        &self.post_mortems
    }

    pub fn generator(&self) -> &PersonalityGenerator {
        &self.generator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_core::{CommunicationStyle, EthicalStance, Personality, RiskTolerance, SocialStrategy};

    fn sample_personality() -> Personality {
        Personality::new(
            CommunicationStyle::Concise,
            EthicalStance::Strict,
            SocialStrategy::Cooperative,
            RiskTolerance::Low,
            42,
        )
    }

    fn populated_roster(n: usize) -> Roster {
        let mut roster = Roster::new(5).unwrap();
        for i in 0..n {
            let agent = Agent::new(format!("agent_{}", i), sample_personality(), 5).unwrap();
            roster.register(agent).unwrap();
        }
        roster
    }

    #[test]
    fn test_replace_preserves_roster_size() {
        let mut roster = populated_roster(4);
        let mut coordinator = ReplacementCoordinator::new(PersonalityGenerator::new(42));

        coordinator.replace(&mut roster, "agent_1", 3, 10, 3, false).unwrap();

        assert_eq!(roster.count(), 4);
        assert!(roster.contains("agent_1"));
    }

    #[test]
    fn test_replace_changes_personality_and_clears_history() {
        let mut roster = populated_roster(4);
        roster.get_mut("agent_2").unwrap().record_round(1, "p", "r");
        let mut coordinator = ReplacementCoordinator::new(PersonalityGenerator::new(42));

        let new_agent = coordinator.replace(&mut roster, "agent_2", 1, 4, 1, true).unwrap();

        assert_eq!(new_agent.id(), "agent_2");
        assert_ne!(*new_agent.personality(), sample_personality());
        assert!(new_agent.history().is_empty());
        assert_eq!(new_agent.history().window(), 5);
    }

    #[test]
    fn test_post_mortem_recorded_once() {
        let mut roster = populated_roster(4);
        let mut coordinator = ReplacementCoordinator::new(PersonalityGenerator::new(42));

        coordinator.replace(&mut roster, "agent_0", 2, 7, 2, true).unwrap();

        let records = coordinator.post_mortems();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            PostMortemRecord {
                agent_id: "agent_0".to_string(),
                personality: sample_personality(),
                rounds_survived: 2,
                total_votes_received: 7,
                elimination_round: 2,
                was_tie: true,
            }
        );
    }

    #[test]
    fn test_replace_missing_identity() {
        let mut roster = populated_roster(3);
        let mut coordinator = ReplacementCoordinator::new(PersonalityGenerator::new(42));

        let err = coordinator.replace(&mut roster, "ghost", 1, 0, 1, false).unwrap_err();
        assert_eq!(err, RosterError::IdentityNotFound("ghost".to_string()));
        assert!(coordinator.post_mortems().is_empty());
        assert_eq!(roster.count(), 3);
    }

    #[test]
    fn test_repeated_replacement_of_same_identity() {
        let mut roster = populated_roster(3);
        let mut coordinator = ReplacementCoordinator::new(PersonalityGenerator::new(7));

        let first = *coordinator.replace(&mut roster, "agent_0", 1, 2, 1, false).unwrap().personality();
        let second = *coordinator.replace(&mut roster, "agent_0", 2, 5, 2, false).unwrap().personality();

        assert_ne!(first, second);
        assert_eq!(coordinator.post_mortems().len(), 2);
        assert_eq!(coordinator.post_mortems()[1].personality, first);
    }
}
