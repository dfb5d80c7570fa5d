pub mod backtester;
pub mod expander;
pub mod prompts;
pub mod providers;

#[cfg(test)]
pub(crate) mod testing;

pub use backtester::StrategyBacktester;
pub use expander::PromptExpander;

use std::io;

use backchat_core::Console;

/// Block for user input, re-prompting until a non-empty line is obtained.
/// Empty input is never forwarded as a message.
pub(crate) fn read_nonempty(console: &dyn Console, prompt: &str) -> io::Result<String> {
    loop {
        let line = console.input(prompt)?;
        let line = line.trim();
        if !line.is_empty() {
            return Ok(line.to_string());
        }
    }
}
