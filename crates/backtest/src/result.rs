use chrono::{DateTime, Utc};
use domain::candle::Candle;
use domain::types::TimestampMs;
use serde::Serialize;
use tracing::info;

use crate::config::BacktestConfig;
use crate::engine::collect_level_tests;
use crate::error::BacktestError;
use crate::level_test::LevelTest;
use crate::provider::HistoryRequest;
use crate::stats::{Stats, calculate_stats};

/// Complete backtest of one symbol / period, written once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub symbol: String,
    pub period: String,
    pub start_date: String,
    pub end_date: String,
    pub candle_count: usize,
    pub swing_count: usize,
    pub total_levels_tested: usize,
    pub stats: Stats,
    pub levels: Vec<LevelTest>,
}

/// `YYYY-MM-DD`, UTC
pub fn format_date(ts: TimestampMs) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts.0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Run the backtest over an already fetched candle series.
pub fn run_backtest(
    request: &HistoryRequest,
    candles: &[Candle],
    config: &BacktestConfig,
) -> Result<BacktestResult, BacktestError> {
    config.validate()?;

    let (Some(first), Some(last)) = (candles.first(), candles.last()) else {
        return Err(BacktestError::NoData {
            symbol: request.symbol.clone(),
        });
    };

    let output = collect_level_tests(candles, config);
    let stats = calculate_stats(&output.levels);

    info!(
        symbol = %request.symbol,
        candles = candles.len(),
        swings = output.swing_count,
        levels = output.levels.len(),
        "backtest finished"
    );

    Ok(BacktestResult {
        symbol: request.symbol.clone(),
        period: request.period_label(),
        start_date: format_date(first.ts),
        end_date: format_date(last.ts),
        candle_count: candles.len(),
        swing_count: output.swing_count,
        total_levels_tested: output.levels.len(),
        stats,
        levels: output.levels,
    })
}
