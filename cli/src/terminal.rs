//! Terminal console: ANSI formatting, prompting, clearing.

use std::io::{self, BufRead, Write};

use backchat_core::Console;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    color_support(
        std::env::var("NO_COLOR").is_ok(),
        std::env::var("COLORTERM").is_ok(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn color_support(no_color: bool, colorterm: bool, term: Option<&str>) -> bool {
    !no_color && (colorterm || term.map(|t| t != "dumb").unwrap_or(false))
}

/// Console over stdin/stdout.
pub struct Terminal {
    color: bool,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            color: supports_color(),
        }
    }

    /// Light markdown styling: `**bold**` spans and `#` headings. Anything
    /// fancier is passed through as-is.
    fn style(&self, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len());
        for line in text.lines() {
            if line.trim_start().starts_with('#') {
                out.push_str(BOLD);
                out.push_str(line);
                out.push_str(RESET);
            } else {
                let mut bold = false;
                let mut rest = line;
                while let Some(idx) = rest.find("**") {
                    out.push_str(&rest[..idx]);
                    out.push_str(if bold { RESET } else { BOLD });
                    bold = !bold;
                    rest = &rest[idx + 2..];
                }
                out.push_str(rest);
                if bold {
                    out.push_str(RESET);
                }
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for Terminal {
    fn print(&self, text: &str) {
        println!("{text}");
    }

    fn print_markdown(&self, text: &str) {
        println!();
        print!("{}", self.style(text));
    }

    fn input(&self, prompt: &str) -> io::Result<String> {
        if self.color {
            print!("{CYAN}{prompt}{RESET}");
        } else {
            print!("{prompt}");
        }
        io::stdout().flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        Ok(line.trim().to_string())
    }

    fn clear(&self) {
        print!("\x1b[2J\x1b[1;1H");
        let _ = io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorterm_enables_color_without_term() {
        assert!(color_support(false, true, None));
        assert!(color_support(false, true, Some("dumb")));
    }

    #[test]
    fn term_enables_color_unless_dumb() {
        assert!(color_support(false, false, Some("xterm-256color")));
        assert!(!color_support(false, false, Some("dumb")));
        assert!(!color_support(false, false, None));
    }

    #[test]
    fn no_color_wins_over_everything() {
        assert!(!color_support(true, true, Some("xterm-256color")));
    }
}
