use std::fmt;

use crate::config::ConfigError;

/// Run-level failures. Per-snapshot skips are not errors, see [`crate::engine::SnapshotSkip`].
#[derive(Debug, Clone, PartialEq)]
pub enum BacktestError {
    NoData { symbol: String },
    Config(ConfigError),
}

impl fmt::Display for BacktestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData { symbol } => write!(f, "No data returned for {}", symbol),
            Self::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for BacktestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::NoData { .. } => None,
        }
    }
}

impl From<ConfigError> for BacktestError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
