use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use backchat_core::{Tool, ToolOutcome};

/// Signals the orchestrator to abandon the current strategy and restart the
/// top-level flow, optionally carrying a seed description forward.
pub struct NewStrategyTool;

#[async_trait]
impl Tool for NewStrategyTool {
    fn name(&self) -> &str {
        "new_strategy"
    }

    fn description(&self) -> &str {
        "Resets the workflow. Use when user wants to start a new strategy from scratch."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "description": {
                    "type": "string",
                    "description": "The new strategy description. If provided, it will be used to initialize the strategy."
                }
            },
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutcome> {
        let seed = args["description"].as_str().unwrap_or("").trim().to_string();
        Ok(ToolOutcome::Restart(seed))
    }
}
