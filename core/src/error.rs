use thiserror::Error;

/// Top-level error type for the backchat runtime.
#[derive(Debug, Error)]
pub enum BackchatError {
    /// Every candidate filename for this slug is already taken. This is a
    /// configuration problem (a directory with 100 variants of one strategy),
    /// not something the user can recover from mid-session.
    #[error("no free filename for strategy slug '{0}' (exhausted suffixes _1..=_99)")]
    NamingExhausted(String),

    #[error("model provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
