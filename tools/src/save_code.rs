use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

use backchat_core::{Tool, ToolOutcome};

/// Fixed acknowledgement returned after every successful save.
pub const SAVED_ACK: &str = "SAVED";

/// Persists model-written strategy code to the strategy's file, then runs the
/// configured formatter commands over it best-effort.
pub struct SaveCodeTool {
    file_path: PathBuf,
    formatters: Vec<PathBuf>,
}

impl SaveCodeTool {
    pub fn new(file_path: impl Into<PathBuf>, formatters: Vec<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            formatters,
        }
    }
}

#[async_trait]
impl Tool for SaveCodeTool {
    fn name(&self) -> &str {
        "save_code"
    }

    fn description(&self) -> &str {
        "The action follows by the code to be saved. Returns SAVED. Saves the strategy code to the file."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The code content to be saved to the file."
                }
            },
            "required": ["content"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutcome> {
        let content = args["content"]
            .as_str()
            .ok_or_else(|| anyhow!("Missing 'content' argument"))?;

        fs::write(&self.file_path, content).await?;
        debug!(path = %self.file_path.display(), bytes = content.len(), "Saved strategy code");

        // Formatting is cosmetic; a missing or failing formatter never blocks
        // the save.
        for formatter in &self.formatters {
            let _ = Command::new(formatter)
                .arg(&self.file_path)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await;
        }

        Ok(ToolOutcome::Saved(SAVED_ACK.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_file() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("backchat-save-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("strategy.py")
    }

    #[tokio::test]
    async fn writes_content_and_acknowledges() {
        let path = temp_file();
        let tool = SaveCodeTool::new(&path, vec![]);

        let outcome = tool
            .execute(serde_json::json!({ "content": "print('hi')\n" }))
            .await
            .unwrap();

        assert_eq!(outcome, ToolOutcome::Saved(SAVED_ACK.to_string()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "print('hi')\n");
    }

    #[tokio::test]
    async fn missing_formatter_is_swallowed() {
        let path = temp_file();
        let tool = SaveCodeTool::new(
            &path,
            vec![PathBuf::from("/nonexistent/.venv/bin/isort")],
        );

        let outcome = tool
            .execute(serde_json::json!({ "content": "x = 1\n" }))
            .await
            .unwrap();

        assert_eq!(outcome, ToolOutcome::Saved(SAVED_ACK.to_string()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x = 1\n");
    }

    #[tokio::test]
    async fn missing_content_argument_is_an_error() {
        let tool = SaveCodeTool::new(temp_file(), vec![]);
        assert!(tool.execute(serde_json::json!({})).await.is_err());
    }
}
