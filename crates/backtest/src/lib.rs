pub mod config;
pub mod engine;
pub mod error;
pub mod provider;
pub mod result;
pub mod stats;

pub use config::{BacktestConfig, ConfigError};
pub use engine::{EngineOutput, SnapshotSkip, collect_level_tests, snapshot_swing, test_swing};
pub use error::BacktestError;
pub use level_test::{LevelKind, LevelTest, test_level};
pub use provider::{Backtester, FrequencyType, HistoryRequest, PeriodType, PriceHistory};
pub use result::{BacktestResult, run_backtest};
pub use stats::{LevelStats, Stats, calculate_stats};
