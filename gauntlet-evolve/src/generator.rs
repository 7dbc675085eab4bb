//! Personality generation
//!
//! Each call derives an effective seed from the base seed, the number of
//! bundles generated so far and (optionally) the identity being filled,
//! then draws every trait uniformly from a ChaCha8 stream on that seed.
//! The same base seed and call sequence always produce the same bundles.

use gauntlet_core::{stable_hash, CommunicationStyle, EthicalStance, Personality, RiskTolerance, SocialStrategy};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic source of fresh personalities
#[derive(Clone, Debug)]
pub struct PersonalityGenerator {
    base_seed: u64,
    generation_count: u64,
}

impl PersonalityGenerator {
    pub fn new(base_seed: u64) -> Self {
        Self {
            base_seed,
            generation_count: 0,
        }
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Number of bundles generated so far
    pub fn generation_count(&self) -> u64 {
        self.generation_count
    }

    /// Generate the next personality.
    ///
    /// # Arguments
    /// * `identity` - Identity the bundle is for; mixes into the seed so
    ///   different identities diverge under the same base seed
    pub fn generate(&mut self, identity: Option<&str>) -> Personality {
        let seed = self.effective_seed(identity);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let personality = Personality::new(
            pick(&CommunicationStyle::ALL, &mut rng),
            pick(&EthicalStance::ALL, &mut rng),
            pick(&SocialStrategy::ALL, &mut rng),
            pick(&RiskTolerance::ALL, &mut rng),
            seed,
        );

        self.generation_count += 1;
        personality
    }

    fn effective_seed(&self, identity: Option<&str>) -> u64 {
        let seed = self.base_seed.wrapping_add(self.generation_count);
        match identity {
            Some(id) if !id.is_empty() => seed ^ stable_hash(id),
            _ => seed,
        }
    }
}

fn pick<T: Copy, R: Rng>(options: &[T], rng: &mut R) -> T {
    options[rng.gen_range(0..options.len())]
}
