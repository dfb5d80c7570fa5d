//! Strategy identity resolution.
//!
//! Derives a stable identity (name, slug, filepath) for a strategy either
//! from a model-produced description or from an existing file on disk.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BackchatError;

/// Marker line the expansion phase instructs the model to emit. The strategy
/// name is the line immediately following it.
pub const NAME_MARKER: &str = "Strategy Name:";

/// File extension for generated strategy code.
pub const STRATEGY_EXT: &str = "py";

/// An immutable strategy identity. Edits to the generated code happen at
/// `filepath`; the entity itself is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    /// Full structured description produced by the model.
    pub description: String,
    /// Human-readable title extracted from the description.
    pub name: String,
    /// Normalized, filesystem-safe identifier.
    pub slug: String,
    /// Where generated code for this strategy is persisted.
    pub filepath: PathBuf,
}

/// Resolver over the strategies root directory.
#[derive(Debug, Clone)]
pub struct StrategyLibrary {
    root: PathBuf,
}

impl StrategyLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a strategy identity from a model-produced description.
    ///
    /// Returns `Ok(None)` when no strategy is derivable from the text: the
    /// name marker is missing, or the extracted name normalizes to an empty
    /// slug. A collision probe that exhausts every numeric suffix is a fatal
    /// configuration error, not a not-found.
    ///
    /// The returned filepath does not exist yet; creating it is the caller's
    /// responsibility.
    pub fn from_description(
        &self,
        description: &str,
    ) -> Result<Option<Strategy>, BackchatError> {
        let name = match extract_name(description) {
            Some(name) => name,
            None => return Ok(None),
        };

        let slug = normalize_slug(&name);
        if slug.is_empty() {
            return Ok(None);
        }

        let existing = self.existing_filenames()?;
        let mut filename = format!("{slug}.{STRATEGY_EXT}");
        if existing.contains(&filename) {
            filename = (1..100)
                .map(|i| format!("{slug}_{i}.{STRATEGY_EXT}"))
                .find(|candidate| !existing.contains(candidate))
                .ok_or_else(|| BackchatError::NamingExhausted(slug.clone()))?;
        }

        Ok(Some(Strategy {
            description: description.to_string(),
            name,
            slug,
            filepath: self.root.join(filename),
        }))
    }

    /// Reflect an existing file into a strategy identity.
    ///
    /// The synthesized description carries only the name marker — it is a
    /// degraded seed for further conversation, not a full specification.
    pub fn from_filepath(&self, filepath: &Path) -> Strategy {
        let slug = filepath
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = title_case(&slug.replace('_', " "));

        Strategy {
            description: format!("**{NAME_MARKER}**\n{name}"),
            name,
            slug,
            filepath: filepath.to_path_buf(),
        }
    }

    fn existing_filenames(&self) -> Result<HashSet<String>, BackchatError> {
        let mut names = HashSet::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.insert(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }
}

/// The name is the line immediately following the marker line, trimmed.
fn extract_name(description: &str) -> Option<String> {
    let mut lines = description.lines();
    while let Some(line) = lines.next() {
        if line.contains(NAME_MARKER) {
            let name = lines.next()?.trim();
            if name.is_empty() {
                return None;
            }
            return Some(name.to_string());
        }
    }
    None
}

/// Lowercase, spaces and hyphens to underscores, everything else outside
/// `[a-z0-9_]` stripped.
fn normalize_slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const SUCCESS_RESPONSE: &str = "**Strategy Name:**\n\
        Golden Cross Moving Average Crossover (1)\n\
        \n\
        **Strategy Description:**\n\
        A classic trend-following strategy that enters long positions when the\n\
        50-period moving average crosses above the 200-period moving average.\n\
        \n\
        **Backtest Configuration:**\n\
        - Asset: BTCUSDT (Bitcoin/USDT pair)\n\
        - Time Interval: 1 day\n\
        - Timeframe: 500 intervals";

    const FAILURE_RESPONSE: &str = "No specific trading strategy was provided in the prompt.\n\
        \n\
        A trading strategy requires at least entry conditions to be defined.";

    fn temp_library() -> StrategyLibrary {
        let root = std::env::temp_dir().join(format!("backchat-strategies-{}", Uuid::new_v4()));
        fs::create_dir_all(&root).unwrap();
        StrategyLibrary::new(root)
    }

    #[test]
    fn from_description_extracts_name_and_slug() {
        let library = temp_library();
        let strategy = library.from_description(SUCCESS_RESPONSE).unwrap().unwrap();

        assert_eq!(strategy.name, "Golden Cross Moving Average Crossover (1)");
        assert_eq!(strategy.slug, "golden_cross_moving_average_crossover_1");
        assert_eq!(
            strategy.filepath,
            library.root().join("golden_cross_moving_average_crossover_1.py")
        );
        assert!(!strategy.filepath.exists());
    }

    #[test]
    fn from_description_without_marker_is_not_found() {
        let library = temp_library();
        assert!(library.from_description(FAILURE_RESPONSE).unwrap().is_none());
    }

    #[test]
    fn from_description_with_punctuation_only_name_is_not_found() {
        let library = temp_library();
        let description = "**Strategy Name:**\n!?!?!\n";
        assert!(library.from_description(description).unwrap().is_none());
    }

    #[test]
    fn collision_picks_first_free_numeric_suffix() {
        let library = temp_library();
        fs::write(
            library.root().join("golden_cross_moving_average_crossover_1.py"),
            "",
        )
        .unwrap();

        let strategy = library.from_description(SUCCESS_RESPONSE).unwrap().unwrap();
        assert_eq!(
            strategy.filepath,
            library
                .root()
                .join("golden_cross_moving_average_crossover_1_1.py")
        );
    }

    #[test]
    fn collision_skips_taken_suffixes() {
        let library = temp_library();
        let slug = "golden_cross_moving_average_crossover_1";
        fs::write(library.root().join(format!("{slug}.py")), "").unwrap();
        fs::write(library.root().join(format!("{slug}_1.py")), "").unwrap();
        fs::write(library.root().join(format!("{slug}_2.py")), "").unwrap();

        let strategy = library.from_description(SUCCESS_RESPONSE).unwrap().unwrap();
        assert_eq!(
            strategy.filepath,
            library.root().join(format!("{slug}_3.py"))
        );
    }

    #[test]
    fn exhausting_all_suffixes_is_fatal() {
        let library = temp_library();
        let slug = "golden_cross_moving_average_crossover_1";
        fs::write(library.root().join(format!("{slug}.py")), "").unwrap();
        for i in 1..100 {
            fs::write(library.root().join(format!("{slug}_{i}.py")), "").unwrap();
        }

        let err = library.from_description(SUCCESS_RESPONSE).unwrap_err();
        assert!(matches!(err, BackchatError::NamingExhausted(s) if s == slug));
    }

    #[test]
    fn directories_are_not_collision_candidates() {
        let library = temp_library();
        fs::create_dir(
            library.root().join("golden_cross_moving_average_crossover_1.py"),
        )
        .unwrap();

        let strategy = library.from_description(SUCCESS_RESPONSE).unwrap().unwrap();
        assert_eq!(
            strategy.filepath,
            library.root().join("golden_cross_moving_average_crossover_1.py")
        );
    }

    #[test]
    fn from_filepath_round_trips_the_stem() {
        let library = temp_library();
        let filepath = library
            .root()
            .join("golden_cross_moving_average_crossover_1.py");

        let strategy = library.from_filepath(&filepath);

        assert_eq!(strategy.filepath, filepath);
        assert_eq!(strategy.name, "Golden Cross Moving Average Crossover 1");
        assert_eq!(strategy.slug, "golden_cross_moving_average_crossover_1");
        assert_eq!(
            strategy.description,
            "**Strategy Name:**\nGolden Cross Moving Average Crossover 1"
        );

        // The degraded description resolves back to the same slug.
        let resolved = library.from_description(&strategy.description).unwrap().unwrap();
        assert_eq!(resolved.slug, strategy.slug);
    }
}
