//! Expansion phase: converse until a structured strategy description is
//! produced.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use backchat_core::{
    Console, ModelProvider, ModelRequest, Strategy, StrategyLibrary, Transcript, Turn,
};

use crate::prompts::EXPANDER_SYSTEM_PROMPT;
use crate::read_nonempty;

const GREETING: &str = "Describe a trading strategy and I'll backtest it.\n\u{2192} ";
const RETRY_PROMPT: &str = "\n\u{2192} ";
const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.2;

/// Expands a user prompt into a resolved [`Strategy`].
pub struct PromptExpander {
    provider: Arc<dyn ModelProvider>,
    library: StrategyLibrary,
}

impl PromptExpander {
    pub fn new(provider: Arc<dyn ModelProvider>, library: StrategyLibrary) -> Self {
        Self { provider, library }
    }

    /// Run the phase to completion. The only exit is a resolved strategy:
    /// while the model's answer yields no identity, the user is re-prompted
    /// and the conversation continues.
    ///
    /// `seed` short-circuits the initial interactive prompt; empty seeds are
    /// ignored. This phase is pure text-in/text-out — no tools, and the
    /// transcript only grows.
    pub async fn run(&self, console: &dyn Console, seed: Option<String>) -> Result<Strategy> {
        let message = match seed.filter(|s| !s.trim().is_empty()) {
            Some(seed) => seed,
            None => read_nonempty(console, GREETING)?,
        };

        let mut transcript = Transcript::new();
        transcript.push(Turn::user_text(message));

        loop {
            debug_assert!(!transcript.is_empty());
            let request = ModelRequest {
                system: EXPANDER_SYSTEM_PROMPT.to_string(),
                messages: transcript.to_turns(),
                tools: vec![],
                max_tokens: MAX_TOKENS,
                temperature: TEMPERATURE,
            };
            let response = self.provider.complete(&request).await?;
            let text = response.text();
            console.print_markdown(&text);

            if let Some(strategy) = self.library.from_description(&text)? {
                debug!(slug = %strategy.slug, "Resolved strategy from description");
                return Ok(strategy);
            }

            transcript.push(Turn::assistant(response.content));
            let reply = read_nonempty(console, RETRY_PROMPT)?;
            transcript.push(Turn::user_text(reply));
        }
    }
}
