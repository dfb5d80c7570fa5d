use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::debug;

use backchat_core::{Tool, ToolOutcome};

/// Subprocess environment for one backtest run, constructed once per call
/// instead of mutating ambient environment variables.
#[derive(Debug, Clone)]
pub struct BacktestConfig {
    /// Interpreter the strategy file is run with (the project venv's python).
    pub interpreter: PathBuf,
    /// Cache directory handed to the backtest runtime.
    pub cache_root: PathBuf,
    /// Log verbosity for the backtest runtime.
    pub log_level: String,
}

/// Runs the persisted strategy file as an isolated subprocess and reports the
/// outcome as text. Process failure is a result string, never an error — the
/// model is expected to read it and fix the code on the next turn.
pub struct RunBacktestTool {
    file_path: PathBuf,
    config: BacktestConfig,
}

impl RunBacktestTool {
    pub fn new(file_path: impl Into<PathBuf>, config: BacktestConfig) -> Self {
        Self {
            file_path: file_path.into(),
            config,
        }
    }

    /// Run the backtest. `plot_to_file` selects whether the chart is written
    /// next to the strategy file or shown interactively.
    pub async fn run(&self, plot_to_file: bool) -> String {
        let mut cmd = Command::new(&self.config.interpreter);
        cmd.arg(&self.file_path)
            .env("CIPHER_CACHE_ROOT", &self.config.cache_root)
            .env("CIPHER_LOG_LEVEL", &self.config.log_level);
        if plot_to_file {
            cmd.env("CIPHER_PLOT_TO_FILE", self.file_path.with_extension("png"));
        }

        debug!(
            path = %self.file_path.display(),
            plot_to_file,
            "Running backtest subprocess"
        );

        match cmd.output().await {
            Ok(output) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                format!("Backtest result:\n{}", stdout.trim())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                format!("Error running backtest:\n{}", stderr.trim())
            }
            Err(err) => format!("Error running backtest:\n{err}"),
        }
    }
}

#[async_trait]
impl Tool for RunBacktestTool {
    fn name(&self) -> &str {
        "run_backtest"
    }

    fn description(&self) -> &str {
        "Runs a backtest on the strategy saved to the file, returns the results of the backtest, or errors."
    }

    fn input_schema(&self) -> Value {
        // The plot-mode flag is internal only, not exposed to the model.
        serde_json::json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        })
    }

    async fn execute(&self, _args: Value) -> Result<ToolOutcome> {
        Ok(ToolOutcome::Ordinary(self.run(true).await))
    }
}
