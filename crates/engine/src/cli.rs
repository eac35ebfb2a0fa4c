use backtest::config::{BacktestConfig, ConfigError};
use backtest::provider::{FrequencyType, HistoryRequest, PeriodType};
use schwab::rest::DEFAULT_BASE_URL;

/// Which history to load and from where
#[derive(clap::Args, Debug, Clone)]
pub struct HistoryArgs {
    #[arg(long, default_value = "SPY")]
    pub symbol: String,
    #[arg(long, default_value = "year")]
    pub period_type: PeriodType,
    #[arg(long, default_value_t = 1)]
    pub period: u32,
    #[arg(long, default_value = "daily")]
    pub frequency_type: FrequencyType,
    #[arg(long, default_value_t = 1)]
    pub frequency: u32,
    #[arg(long, default_value_t = false)]
    pub extended_hours: bool,
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
    /// CSV candle cache; reused unless --refresh
    #[arg(long)]
    pub cache: Option<String>,
    #[arg(long, default_value_t = false)]
    pub refresh: bool,
}

/// Level detection / testing parameters
#[derive(clap::Args, Debug, Clone)]
pub struct LevelArgs {
    #[arg(long, default_value_t = 5)]
    pub lookback: usize,
    #[arg(long, default_value_t = 0.5)]
    pub confluence_tolerance_pct: f64,
    #[arg(long, default_value_t = 0.3)]
    pub pierce_tolerance_pct: f64,
    #[arg(long, default_value_t = 50)]
    pub test_window: usize,
    #[arg(long, default_value_t = 20)]
    pub point_c_window: usize,
    #[arg(long, default_value_t = 5)]
    pub max_reactions: usize,
}

impl HistoryArgs {
    pub fn request(&self) -> HistoryRequest {
        HistoryRequest {
            symbol: self.symbol.clone(),
            period_type: self.period_type,
            period: self.period,
            frequency_type: self.frequency_type,
            frequency: self.frequency,
            extended_hours: self.extended_hours,
        }
    }
}

impl LevelArgs {
    pub fn config(&self) -> Result<BacktestConfig, ConfigError> {
        let cfg = BacktestConfig {
            swing_lookback: self.lookback,
            confluence_tolerance_pct: self.confluence_tolerance_pct,
            pierce_tolerance_pct: self.pierce_tolerance_pct,
            test_window: self.test_window,
            point_c_window: self.point_c_window,
            max_reactions: self.max_reactions,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
