mod config;
mod terminal;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use backchat_agent::providers::AnthropicProvider;
use backchat_agent::{PromptExpander, StrategyBacktester};
use backchat_core::{BackchatError, StrategyLibrary};
use backchat_tools::BacktestConfig;

use config::Config;
use terminal::Terminal;

#[derive(Parser)]
#[command(name = "backchat")]
#[command(about = "Conversational assistant that turns trading ideas into running backtests")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a chat session, optionally resuming an existing strategy file
    Chat {
        /// Strategy file to resume from
        filepath: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Logs go to stderr so they never interleave with the conversation.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat { filepath } => run_chat(config, filepath).await,
    }
}

async fn run_chat(config: Config, filepath: Option<PathBuf>) -> Result<()> {
    debug!(root = %config.root_path.display(), "Using project root");

    let api_key = config.anthropic_api_key.clone().ok_or_else(|| {
        BackchatError::Config("ANTHROPIC_API_KEY is not set".to_string())
    })?;

    let mut provider = AnthropicProvider::new(api_key);
    if let Some(model) = &config.model {
        provider = provider.with_model(model.clone());
    }
    let provider = Arc::new(provider);

    std::fs::create_dir_all(&config.strategies_path)
        .with_context(|| format!("creating {}", config.strategies_path.display()))?;
    let library = StrategyLibrary::new(&config.strategies_path);

    let framework_docs = match std::fs::read_to_string(&config.docs_path) {
        Ok(docs) => docs,
        Err(err) => {
            warn!(path = %config.docs_path.display(), %err, "Framework docs not found; continuing without them");
            String::new()
        }
    };

    let expander = PromptExpander::new(provider.clone(), library.clone());
    let backtester = StrategyBacktester::new(
        provider,
        framework_docs,
        BacktestConfig {
            interpreter: config.interpreter.clone(),
            cache_root: config.cache_root.clone(),
            log_level: "ERROR".to_string(),
        },
        config.formatters.clone(),
    );

    let console = Terminal::new();

    let mut strategy = match filepath {
        Some(path) => library.from_filepath(&path),
        None => expander.run(&console, None).await?,
    };

    loop {
        let seed = backtester.run(&console, &strategy).await?;
        strategy = expander.run(&console, seed).await?;
    }
}
