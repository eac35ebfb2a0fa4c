use std::time::Duration;

use anyhow::Context;
use backtest::provider::{HistoryRequest, PriceHistory};
use domain::candle::Candle;
use domain::types::{Price, Qty, TimestampMs};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Client for the local trading dashboard API
#[derive(Clone)]
pub struct SchwabRest {
    client: reqwest::Client,
    base: String,
}

impl SchwabRest {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("http client build failed")?;

        Ok(Self {
            client,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `GET /api/history/{symbol}`, ascending by timestamp
    pub async fn get_history(&self, req: &HistoryRequest) -> anyhow::Result<Vec<Candle>> {
        let url = format!("{}/api/history/{}", self.base, req.symbol);
        let period = req.period.to_string();
        let frequency = req.frequency.to_string();

        let resp: HistoryResp = self
            .client
            .get(url)
            .query(&[
                ("period_type", req.period_type.as_str()),
                ("period", period.as_str()),
                ("frequency_type", req.frequency_type.as_str()),
                ("frequency", frequency.as_str()),
                ("extended_hours", if req.extended_hours { "true" } else { "false" }),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("bad history payload for {}", req.symbol))?;

        let candles = into_candles(resp);
        debug!(symbol = %req.symbol, candles = candles.len(), "history fetched");

        Ok(candles)
    }
}

impl PriceHistory for SchwabRest {
    async fn get_history(&self, request: &HistoryRequest) -> anyhow::Result<Vec<Candle>> {
        SchwabRest::get_history(self, request).await
    }
}

#[derive(Debug, Deserialize)]
struct HistoryResp {
    #[serde(default)]
    candles: Vec<CandleRow>,
}

#[derive(Debug, Deserialize)]
struct CandleRow {
    /// unix ms
    datetime: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

fn into_candles(resp: HistoryResp) -> Vec<Candle> {
    let mut out: Vec<Candle> = resp
        .candles
        .into_iter()
        .map(|row| Candle {
            ts: TimestampMs(row.datetime),
            open: Price(row.open),
            high: Price(row.high),
            low: Price(row.low),
            close: Price(row.close),
            volume: Qty(row.volume),
        })
        .collect();

    // swing indices assume strictly ascending bars
    out.sort_by_key(|c| c.ts);
    out.dedup_by_key(|c| c.ts);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_sorted_and_deduplicated() {
        let raw = r#"{
            "symbol": "SPY",
            "candles": [
                {"datetime": 2000, "open": 2, "high": 3, "low": 1, "close": 2.5, "volume": 10},
                {"datetime": 1000, "open": 1, "high": 2, "low": 0.5, "close": 1.5, "volume": 20},
                {"datetime": 2000, "open": 2, "high": 3, "low": 1, "close": 2.5, "volume": 10}
            ]
        }"#;
        let resp: HistoryResp = serde_json::from_str(raw).unwrap();

        let candles = into_candles(resp);

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].ts, TimestampMs(1000));
        assert_eq!(candles[0].low, Price(0.5));
        assert_eq!(candles[1].close, Price(2.5));
        assert_eq!(candles[1].volume, Qty(10.0));
    }

    #[test]
    fn missing_candles_is_empty() {
        let resp: HistoryResp = serde_json::from_str(r#"{"empty": true}"#).unwrap();
        assert!(into_candles(resp).is_empty());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = SchwabRest::new("http://localhost:8000/").unwrap();
        assert_eq!(api.base, "http://localhost:8000");
    }
}
