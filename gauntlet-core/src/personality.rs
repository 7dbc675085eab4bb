//! Personality - categorical trait bundle for an agent
//!
//! Each trait dimension is a closed enum so an invalid trait value cannot
//! be constructed. A bundle is immutable once built; replacement swaps
//! the whole bundle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How the agent communicates its responses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationStyle {
    Concise,
    Verbose,
    Rhetorical,
    Analytical,
}

impl CommunicationStyle {
    pub const ALL: [CommunicationStyle; 4] = [
        CommunicationStyle::Concise,
        CommunicationStyle::Verbose,
        CommunicationStyle::Rhetorical,
        CommunicationStyle::Analytical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommunicationStyle::Concise => "concise",
            CommunicationStyle::Verbose => "verbose",
            CommunicationStyle::Rhetorical => "rhetorical",
            CommunicationStyle::Analytical => "analytical",
        }
    }
}

/// The agent's ethical framework
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EthicalStance {
    Strict,
    Flexible,
    Amoral,
}

impl EthicalStance {
    pub const ALL: [EthicalStance; 3] = [
        EthicalStance::Strict,
        EthicalStance::Flexible,
        EthicalStance::Amoral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EthicalStance::Strict => "strict",
            EthicalStance::Flexible => "flexible",
            EthicalStance::Amoral => "amoral",
        }
    }
}

/// How the agent approaches other agents
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialStrategy {
    Cooperative,
    Opportunistic,
    Adversarial,
}

impl SocialStrategy {
    pub const ALL: [SocialStrategy; 3] = [
        SocialStrategy::Cooperative,
        SocialStrategy::Opportunistic,
        SocialStrategy::Adversarial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SocialStrategy::Cooperative => "cooperative",
            SocialStrategy::Opportunistic => "opportunistic",
            SocialStrategy::Adversarial => "adversarial",
        }
    }
}

/// Willingness to take risks in responses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

impl RiskTolerance {
    pub const ALL: [RiskTolerance; 3] = [RiskTolerance::Low, RiskTolerance::Medium, RiskTolerance::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTolerance::Low => "low",
            RiskTolerance::Medium => "medium",
            RiskTolerance::High => "high",
        }
    }
}

/// Immutable trait bundle plus the seed it was generated from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Personality {
    pub communication_style: CommunicationStyle,
    pub ethical_stance: EthicalStance,
    pub social_strategy: SocialStrategy,
    pub risk_tolerance: RiskTolerance,
    pub seed: u64,
}

impl Personality {
    pub fn new(
        communication_style: CommunicationStyle,
        ethical_stance: EthicalStance,
        social_strategy: SocialStrategy,
        risk_tolerance: RiskTolerance,
        seed: u64,
    ) -> Self {
        Self {
            communication_style,
            ethical_stance,
            social_strategy,
            risk_tolerance,
            seed,
        }
    }

    /// Flat string map of the bundle, as recorded in replacement events.
    ///
    /// The seed is rendered as a decimal string so the map stays
    /// homogeneous.
    pub fn to_trait_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("communication_style".to_string(), self.communication_style.as_str().to_string());
        map.insert("ethical_stance".to_string(), self.ethical_stance.as_str().to_string());
        map.insert("social_strategy".to_string(), self.social_strategy.as_str().to_string());
        map.insert("risk_tolerance".to_string(), self.risk_tolerance.as_str().to_string());
        map.insert("seed".to_string(), self.seed.to_string());
        map
    }

    /// One-line human description (seed omitted)
    pub fn describe(&self) -> String {
        format!(
            "Communication: {}, Ethics: {}, Strategy: {}, Risk: {}",
            self.communication_style.as_str(),
            self.ethical_stance.as_str(),
            self.social_strategy.as_str(),
            self.risk_tolerance.as_str()
        )
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
