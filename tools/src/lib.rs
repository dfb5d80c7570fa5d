pub mod new_strategy;
pub mod run_backtest;
pub mod save_code;

pub use new_strategy::NewStrategyTool;
pub use run_backtest::{BacktestConfig, RunBacktestTool};
pub use save_code::{SaveCodeTool, SAVED_ACK};
