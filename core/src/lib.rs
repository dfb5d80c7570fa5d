pub mod console;
pub mod error;
pub mod strategy;
pub mod tools;
pub mod traits;
pub mod transcript;

pub use console::Console;
pub use error::BackchatError;
pub use strategy::{Strategy, StrategyLibrary};
pub use tools::ToolRegistry;
pub use traits::{
    ModelProvider, ModelRequest, ModelResponse, Tool, ToolDefinition, ToolOutcome,
};
pub use transcript::{ContentBlock, Role, Transcript, Turn};
