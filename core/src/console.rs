use std::io;

/// Interactive surface for one session.
///
/// Every user-facing suspension point goes through this trait, so a test
/// harness can substitute scripted input without real blocking.
pub trait Console: Send + Sync {
    /// Render plain text (tool results, acknowledgements).
    fn print(&self, text: &str);

    /// Render model-authored text, which is typically markdown.
    fn print_markdown(&self, text: &str);

    /// Show the prompt and block for one line of input, trimmed.
    fn input(&self, prompt: &str) -> io::Result<String>;

    /// Clear the display.
    fn clear(&self);
}
