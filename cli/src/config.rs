use std::path::PathBuf;

/// backchat runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root holding the strategies dir, venv, cache, and docs.
    pub root_path: PathBuf,
    /// Directory with one source file per strategy.
    pub strategies_path: PathBuf,
    /// Framework documentation blob sent to the build phase.
    pub docs_path: PathBuf,
    /// Interpreter the strategy files run with.
    pub interpreter: PathBuf,
    /// Best-effort formatter commands run after each save.
    pub formatters: Vec<PathBuf>,
    /// Cache directory for the backtest runtime.
    pub cache_root: PathBuf,
    /// Model identifier sent to the provider.
    pub model: Option<String>,
    /// Anthropic API key.
    pub anthropic_api_key: Option<String>,
    /// Log level when RUST_LOG is unset.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let root_path = std::env::var("BACKCHAT_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let venv = root_path.join(".venv/bin");

        Self {
            strategies_path: root_path.join("strategies"),
            docs_path: std::env::var("BACKCHAT_DOCS")
                .map(PathBuf::from)
                .unwrap_or_else(|_| root_path.join("docs/cipher.md")),
            interpreter: std::env::var("BACKCHAT_PYTHON")
                .map(PathBuf::from)
                .unwrap_or_else(|_| venv.join("python")),
            formatters: vec![venv.join("isort"), venv.join("black")],
            cache_root: root_path.join(".cache"),
            model: std::env::var("BACKCHAT_MODEL").ok(),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()),
            root_path,
        }
    }
}
