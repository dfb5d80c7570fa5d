use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::transcript::{ContentBlock, Turn};

/// What a tool execution means for the orchestrator's control flow.
///
/// The orchestrator switches on this tag instead of inspecting concrete tool
/// identity, so control flow is decoupled from tool naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Plain result text, fed back to the model as a tool result.
    Ordinary(String),
    /// Code was persisted; the payload is the acknowledgement text. The
    /// orchestrator must sync its pinned code record before the next request.
    Saved(String),
    /// Abandon the current strategy and restart the top-level flow, carrying
    /// the payload (possibly empty) as the next seed prompt.
    Restart(String),
}

/// A named, schema-described action the model may request.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name of the tool (e.g., "save_code").
    fn name(&self) -> &str;

    /// Description for the calling model.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's input.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: serde_json::Value) -> Result<ToolOutcome>;
}

/// Tool schema entry sent to the model alongside the transcript.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
    pub fn of(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.input_schema(),
        }
    }
}

/// One request to the model provider.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system: String,
    pub messages: Vec<Turn>,
    pub tools: Vec<ToolDefinition>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Ordered content units returned by the model.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: Option<String>,
}

impl ModelResponse {
    /// Concatenated text of all text units, in order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for block in &self.content {
            if let ContentBlock::Text { text } = block {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(text);
            }
        }
        out
    }
}

/// Trait for hosted model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send a request and block until the full response is returned.
    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse>;
}
