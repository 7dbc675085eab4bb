//! Response generation seam
//!
//! The arena only needs a string back for each agent and round. How it
//! is produced is up to the implementor.

use gauntlet_core::{Agent, RoundContext};

/// Produces one agent's answer to a round's prompt
pub trait ResponseGenerator {
    fn generate(&mut self, agent: &Agent, context: &RoundContext) -> String;
}

impl<F> ResponseGenerator for F
where
    F: FnMut(&Agent, &RoundContext) -> String,
{
    fn generate(&mut self, agent: &Agent, context: &RoundContext) -> String {
        self(agent, context)
    }
}

/// Fixed-format stand-in used when no model is wired up
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaceholderResponder;

impl ResponseGenerator for PlaceholderResponder {
    fn generate(&mut self, agent: &Agent, context: &RoundContext) -> String {
        format!(
            "[Agent {}] Response to round {}: '{}...' (Personality: {})",
            agent.id(),
            context.round_number,
            truncate_chars(&context.prompt, 50),
            agent.personality().communication_style.as_str()
        )
    }
}

/// First `max` characters of `s`, never splitting a code point
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((index, _)) => &s[..index],
        None => s,
    }
}
