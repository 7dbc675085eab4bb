//! Settings file - JSON run configuration with defaults
//!
//! Every key is optional. A missing file means all defaults.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use gauntlet_tournament::{ArenaConfig, Schedule, MIN_PARTICIPANTS};

const DEFAULT_PROMPTS: &[&str] = &[
    "What is the most important quality for survival in a group?",
    "Describe a situation where breaking a rule is justified.",
    "Who in this arena contributes the least, and why?",
    "How should scarce resources be divided among competitors?",
    "What would you sacrifice to stay in the game?",
    "Make the case that you deserve to remain.",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub num_agents: usize,
    pub rounds: usize,
    pub rounds_per_elimination: u32,
    pub memory_window: usize,
    pub random_seed: u64,
    pub log_level: String,
    pub event_log: PathBuf,
    pub prompts: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_agents: 8,
            rounds: 6,
            rounds_per_elimination: 2,
            memory_window: 5,
            random_seed: 42,
            log_level: "info".to_string(),
            event_log: PathBuf::from("logs/events.jsonl"),
            prompts: DEFAULT_PROMPTS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Command-line values that take precedence over the file
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub rounds: Option<usize>,
    pub agents: Option<usize>,
    pub event_log: Option<PathBuf>,
}

impl Settings {
    /// Load settings from `path`, or defaults if it is absent
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse settings: {}", path.display()))
    }

    pub fn apply(mut self, overrides: &Overrides) -> Self {
        if let Some(seed) = overrides.seed {
            self.random_seed = seed;
        }
        if let Some(rounds) = overrides.rounds {
            self.rounds = rounds;
        }
        if let Some(agents) = overrides.agents {
            self.num_agents = agents;
        }
        if let Some(event_log) = &overrides.event_log {
            self.event_log = event_log.clone();
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_agents < MIN_PARTICIPANTS {
            bail!("num_agents must be at least {}, got {}", MIN_PARTICIPANTS, self.num_agents);
        }
        if self.memory_window == 0 {
            bail!("memory_window must be at least 1");
        }
        if self.rounds_per_elimination == 0 {
            bail!("rounds_per_elimination must be at least 1");
        }
        if self.rounds > 0 && self.prompts.is_empty() {
            bail!("prompts must not be empty when rounds > 0");
        }
        Ok(())
    }

    pub fn arena_config(&self) -> ArenaConfig {
        ArenaConfig::default()
            .with_seed(self.random_seed)
            .with_setting("num_agents", self.num_agents)
            .with_setting("rounds", self.rounds)
            .with_setting("rounds_per_elimination", self.rounds_per_elimination)
    }

    /// One prompt per round, cycling the configured list
    pub fn schedule(&self) -> Schedule {
        let prompts = self.prompts.iter().cycle().take(self.rounds).cloned().collect();
        Schedule::new(prompts).with_rounds_per_elimination(self.rounds_per_elimination)
    }
}
