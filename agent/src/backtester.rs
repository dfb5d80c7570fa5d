//! Build/Iterate phase: converse with the model, dispatch tool calls, keep
//! the pinned code record in sync, and accept follow-up edits or a reset.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};
use uuid::Uuid;

use backchat_core::{
    Console, ContentBlock, ModelProvider, ModelRequest, Strategy, Tool, ToolOutcome,
    ToolRegistry, Transcript, Turn,
};
use backchat_tools::{BacktestConfig, NewStrategyTool, RunBacktestTool, SaveCodeTool};

use crate::prompts::BACKTESTER_SYSTEM_PROMPT;
use crate::read_nonempty;

const MAX_TOKENS: u32 = 10000;
const TEMPERATURE: f32 = 0.0;

/// Reserved commands intercepted before anything is sent to the model.
const CHART_COMMAND: &str = "/chart";
const NEW_COMMAND: &str = "/new";

/// Drives one strategy through coding, backtesting, and tuning.
pub struct StrategyBacktester {
    provider: Arc<dyn ModelProvider>,
    framework_docs: String,
    backtest: BacktestConfig,
    formatters: Vec<PathBuf>,
}

impl StrategyBacktester {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        framework_docs: String,
        backtest: BacktestConfig,
        formatters: Vec<PathBuf>,
    ) -> Self {
        Self {
            provider,
            framework_docs,
            backtest,
            formatters,
        }
    }

    /// Run the phase for one strategy.
    ///
    /// Returns `Some(seed)` when the model requested a fresh strategy (the
    /// seed may be empty) and `None` when the user abandoned the current one
    /// with `/new`. Either way the strategy file persists on disk.
    pub async fn run(&self, console: &dyn Console, strategy: &Strategy) -> Result<Option<String>> {
        let mut transcript = Transcript::new();
        transcript.seed(Turn::user_text(strategy.description.clone()));
        if !self.framework_docs.is_empty() {
            transcript.seed(Turn::user_text(self.framework_docs.clone()));
        }

        let save_tool = Arc::new(SaveCodeTool::new(&strategy.filepath, self.formatters.clone()));

        // Resuming: prime the model with the current code state as a
        // fabricated save invocation plus its acknowledgement, keeping the
        // tool protocol symmetric without re-sending the code as plain text.
        if strategy.filepath.exists() {
            let code = tokio::fs::read_to_string(&strategy.filepath).await?;
            transcript.pin_code_with_preamble(
                fabricate_tool_use_id(),
                save_tool.name(),
                format!(
                    "Now I'll implement the \"{}\" strategy according to your specifications:",
                    strategy.name
                ),
                code,
                backchat_tools::SAVED_ACK,
            );
        }

        let chart_tool = RunBacktestTool::new(&strategy.filepath, self.backtest.clone());

        let mut registry = ToolRegistry::new();
        registry.register(save_tool);
        registry.register(Arc::new(RunBacktestTool::new(
            &strategy.filepath,
            self.backtest.clone(),
        )));
        registry.register(Arc::new(NewStrategyTool));

        loop {
            debug_assert!(!transcript.is_empty());
            let request = ModelRequest {
                system: BACKTESTER_SYSTEM_PROMPT.to_string(),
                messages: transcript.to_turns(),
                tools: registry.definitions(),
                max_tokens: MAX_TOKENS,
                temperature: TEMPERATURE,
            };
            let response = self.provider.complete(&request).await?;

            // The assistant turn under construction, plus the result turns
            // that must follow it once flushed.
            let mut pending: Vec<ContentBlock> = Vec::new();
            let mut pending_results: Vec<Turn> = Vec::new();
            let mut invoked_tool = false;

            for block in response.content {
                match block {
                    ContentBlock::Text { text } => {
                        console.print_markdown(&text);
                        pending.push(ContentBlock::Text { text });
                    }
                    ContentBlock::ToolUse { id, name, input } => {
                        invoked_tool = true;
                        let outcome = self.dispatch(&registry, &name, input.clone()).await;
                        match outcome {
                            ToolOutcome::Restart(seed) => {
                                console.clear();
                                return Ok(Some(seed));
                            }
                            ToolOutcome::Saved(ack) => {
                                flush(&mut transcript, &mut pending, &mut pending_results);
                                let code = tokio::fs::read_to_string(&strategy.filepath)
                                    .await
                                    .unwrap_or_else(|err| {
                                        warn!(%err, "Could not re-read saved strategy file");
                                        String::new()
                                    });
                                console.print(&ack);
                                transcript.pin_code(id, name, code, ack);
                            }
                            ToolOutcome::Ordinary(text) => {
                                console.print(&text);
                                pending.push(ContentBlock::ToolUse { id: id.clone(), name, input });
                                pending_results.push(Turn::tool_result(id, text));
                            }
                        }
                    }
                    // Responses never carry tool results.
                    ContentBlock::ToolResult { .. } => {}
                }
            }
            flush(&mut transcript, &mut pending, &mut pending_results);

            // Models may chain tool calls across turns: go straight back to
            // the model without asking the user anything.
            if invoked_tool {
                continue;
            }

            loop {
                let filename = strategy
                    .filepath
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let message = read_nonempty(console, &format!("{filename}\n\u{2192} "))?;

                if message == CHART_COMMAND {
                    // Off-transcript: show the chart interactively and keep
                    // waiting for a real message.
                    let _ = chart_tool.run(false).await;
                    continue;
                }
                if message == NEW_COMMAND {
                    console.clear();
                    return Ok(None);
                }

                // The file may have changed out of band (user edit, external
                // formatter); re-sync the model's view of the current code.
                if let Ok(code) = tokio::fs::read_to_string(&strategy.filepath).await {
                    transcript.refresh_pinned_code(code);
                }
                transcript.push(Turn::user_text(message));
                break;
            }
        }
    }

    /// Execute one tool invocation. Failures never escape: unknown names and
    /// tool errors become ordinary result text for the model to read.
    async fn dispatch(
        &self,
        registry: &ToolRegistry,
        name: &str,
        input: serde_json::Value,
    ) -> ToolOutcome {
        debug!(tool = name, "Dispatching tool invocation");
        match registry.get(name) {
            Some(tool) => tool
                .execute(input)
                .await
                .unwrap_or_else(|err| ToolOutcome::Ordinary(format!("Tool '{name}' failed: {err}"))),
            None => ToolOutcome::Ordinary(format!("Unknown tool: {name}")),
        }
    }
}

fn flush(transcript: &mut Transcript, pending: &mut Vec<ContentBlock>, results: &mut Vec<Turn>) {
    if !pending.is_empty() {
        transcript.push(Turn::assistant(std::mem::take(pending)));
    }
    for turn in results.drain(..) {
        transcript.push(turn);
    }
}

fn fabricate_tool_use_id() -> String {
    format!("toolu_{}", Uuid::new_v4().simple())
}
