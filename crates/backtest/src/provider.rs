use std::fmt;
use std::future::Future;
use std::str::FromStr;

use anyhow::Result;
use domain::candle::Candle;
use serde::{Deserialize, Serialize};

use crate::config::{BacktestConfig, ConfigError};
use crate::result::{BacktestResult, run_backtest};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Day,
    Month,
    Year,
    Ytd,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyType {
    Minute,
    Daily,
    Weekly,
    Monthly,
}

impl PeriodType {
    pub fn as_str(self) -> &'static str {
        match self {
            PeriodType::Day => "day",
            PeriodType::Month => "month",
            PeriodType::Year => "year",
            PeriodType::Ytd => "ytd",
        }
    }
}

impl FrequencyType {
    pub fn as_str(self) -> &'static str {
        match self {
            FrequencyType::Minute => "minute",
            FrequencyType::Daily => "daily",
            FrequencyType::Weekly => "weekly",
            FrequencyType::Monthly => "monthly",
        }
    }
}

impl FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "day" => Ok(PeriodType::Day),
            "month" => Ok(PeriodType::Month),
            "year" => Ok(PeriodType::Year),
            "ytd" => Ok(PeriodType::Ytd),
            other => Err(format!("unknown period type: {}", other)),
        }
    }
}

impl FromStr for FrequencyType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "minute" => Ok(FrequencyType::Minute),
            "daily" => Ok(FrequencyType::Daily),
            "weekly" => Ok(FrequencyType::Weekly),
            "monthly" => Ok(FrequencyType::Monthly),
            other => Err(format!("unknown frequency type: {}", other)),
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FrequencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to fetch from the price-history provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    pub symbol: String,
    pub period_type: PeriodType,
    pub period: u32,
    pub frequency_type: FrequencyType,
    pub frequency: u32,
    pub extended_hours: bool,
}

impl HistoryRequest {
    /// One year of daily bars
    pub fn daily_year(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            period_type: PeriodType::Year,
            period: 1,
            frequency_type: FrequencyType::Daily,
            frequency: 1,
            extended_hours: false,
        }
    }

    /// e.g. `1 year(s)`
    pub fn period_label(&self) -> String {
        format!("{} {}(s)", self.period, self.period_type)
    }
}

/// Source of ascending OHLC history. An empty result means "no data".
pub trait PriceHistory {
    fn get_history(
        &self,
        request: &HistoryRequest,
    ) -> impl Future<Output = Result<Vec<Candle>>> + Send;
}

/// Fetch, then backtest
pub struct Backtester<P> {
    provider: P,
    config: BacktestConfig,
}

impl<P: PriceHistory> Backtester<P> {
    pub fn new(provider: P, config: BacktestConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    pub async fn run(&self, request: &HistoryRequest) -> Result<BacktestResult> {
        let candles = self.provider.get_history(request).await?;
        let result = run_backtest(request, &candles, &self.config)?;
        Ok(result)
    }
}
