//! Configuration types for arena runs
//!
//! Level 4 - Utilities and configuration

use std::collections::BTreeMap;

use serde_json::Value;

/// Fewest agents a round can start with
pub const MIN_PARTICIPANTS: usize = 3;

/// Arena controller configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ArenaConfig {
    /// Minimum roster size required to start a round
    pub min_participants: usize,
    /// Seed mixed into the final elimination tie-break
    pub random_seed: u64,
    /// Extra key/value pairs recorded verbatim in `ArenaInitialized`
    pub extra_settings: BTreeMap<String, Value>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            min_participants: MIN_PARTICIPANTS,
            random_seed: 42,
            extra_settings: BTreeMap::new(),
        }
    }
}

impl ArenaConfig {
    /// Set the tie-break seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Record an additional setting in the run's initialization event
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_settings.insert(key.into(), value.into());
        self
    }

    /// Opaque settings map written to the event log
    pub fn to_settings_map(&self) -> BTreeMap<String, Value> {
        let mut map = self.extra_settings.clone();
        map.insert("min_participants".to_string(), Value::from(self.min_participants));
        map.insert("random_seed".to_string(), Value::from(self.random_seed));
        map
    }
}

/// Prompts to play and how often to eliminate
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    /// One round per prompt, in order
    pub prompts: Vec<String>,
    /// Resolve an elimination after every N rounds
    pub rounds_per_elimination: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            prompts: Vec::new(),
            rounds_per_elimination: 2,
        }
    }
}

impl Schedule {
    pub fn new(prompts: Vec<String>) -> Self {
        Self {
            prompts,
            ..Default::default()
        }
    }

    /// Set elimination cadence (clamped to at least 1)
    pub fn with_rounds_per_elimination(mut self, rounds: u32) -> Self {
        self.rounds_per_elimination = rounds.max(1);
        self
    }

    /// Whether an elimination is due after `round_number`
    pub fn is_elimination_round(&self, round_number: u32) -> bool {
        self.rounds_per_elimination > 0 && round_number % self.rounds_per_elimination == 0
    }
}
