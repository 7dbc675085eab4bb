//! GAUNTLET Evolution - Replacement of eliminated agents
//!
//! Evolution here is by elimination only; nothing is learned or tuned:
//! - Seeded personality generation
//! - Post-mortem records of eliminated agents
//! - Replacement coordination (retire, record, reinstate)

mod generator;
mod post_mortem;
mod replacement;

pub use generator::PersonalityGenerator;
pub use post_mortem::PostMortemRecord;
pub use replacement::ReplacementCoordinator;
