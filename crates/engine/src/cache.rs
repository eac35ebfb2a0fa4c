use std::path::Path;

use anyhow::{Context, Result};
use backtest::provider::{HistoryRequest, PriceHistory};
use domain::candle::Candle;
use domain::types::{Price, Qty, TimestampMs};
use tracing::info;

/// One cache line: `ts,open,high,low,close,volume`
#[derive(serde::Serialize, serde::Deserialize)]
struct CacheRow {
    ts: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl From<&Candle> for CacheRow {
    fn from(c: &Candle) -> Self {
        Self {
            ts: c.ts.0,
            open: c.open.0,
            high: c.high.0,
            low: c.low.0,
            close: c.close.0,
            volume: c.volume.0,
        }
    }
}

impl From<CacheRow> for Candle {
    fn from(row: CacheRow) -> Self {
        Candle {
            ts: TimestampMs(row.ts),
            open: Price(row.open),
            high: Price(row.high),
            low: Price(row.low),
            close: Price(row.close),
            volume: Qty(row.volume),
        }
    }
}

pub fn read_cache(path: impl AsRef<Path>) -> Result<Vec<Candle>> {
    csv::Reader::from_path(path)?
        .deserialize::<CacheRow>()
        .map(|row| Ok(Candle::from(row?)))
        .collect()
}

/// Replace the cache file, creating parent directories as needed.
pub fn write_cache(path: impl AsRef<Path>, candles: &[Candle]) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let mut wtr = csv::Writer::from_path(path)?;
    candles
        .iter()
        .try_for_each(|c| wtr.serialize(CacheRow::from(c)))?;
    wtr.flush()?;
    Ok(())
}

/// Provider wrapper that reads / refreshes a CSV cache
pub struct CachedHistory<P> {
    inner: P,
    path: Option<String>,
    refresh: bool,
}

impl<P> CachedHistory<P> {
    pub fn new(inner: P, path: Option<String>, refresh: bool) -> Self {
        Self {
            inner,
            path,
            refresh,
        }
    }
}

impl<P: PriceHistory + Sync> PriceHistory for CachedHistory<P> {
    async fn get_history(&self, request: &HistoryRequest) -> Result<Vec<Candle>> {
        let Some(path) = self.path.as_deref() else {
            return self.inner.get_history(request).await;
        };

        if !self.refresh && Path::new(path).exists() {
            let candles = read_cache(path).context("read cache failed")?;
            info!(path, candles = candles.len(), "candles loaded from cache");
            return Ok(candles);
        }

        let candles = self
            .inner
            .get_history(request)
            .await
            .context("history download failed")?;
        // an empty fetch stays a "no data" condition, do not cache it
        if !candles.is_empty() {
            write_cache(path, &candles).context("write cache failed")?;
        }
        Ok(candles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(ts: i64, close: f64) -> Candle {
        Candle {
            ts: TimestampMs(ts),
            open: Price(close - 0.5),
            high: Price(close + 1.0),
            low: Price(close - 1.0),
            close: Price(close),
            volume: Qty(1500.0),
        }
    }

    struct Fixed(Vec<Candle>);

    impl PriceHistory for Fixed {
        async fn get_history(&self, _request: &HistoryRequest) -> Result<Vec<Candle>> {
            Ok(self.0.clone())
        }
    }

    fn temp_path(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!("dinapoli-cache-{}", std::process::id()));
        dir.join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn cache_round_trip_keeps_candles() {
        let path = temp_path("round_trip.csv");
        let candles = vec![candle(1_000, 100.25), candle(2_000, 101.5)];

        write_cache(&path, &candles).unwrap();
        let back = read_cache(&path).unwrap();

        assert_eq!(back, candles);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn cache_file_uses_plain_column_layout() {
        let path = temp_path("layout.csv");
        write_cache(&path, &[candle(1_000, 100.0)]).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let mut lines = raw.lines();
        assert_eq!(lines.next(), Some("ts,open,high,low,close,volume"));
        assert_eq!(lines.next(), Some("1000,99.5,101.0,99.0,100.0,1500.0"));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn cached_file_wins_over_provider() {
        let path = temp_path("cached_wins.csv");
        write_cache(&path, &[candle(1_000, 50.0)]).unwrap();

        let provider = CachedHistory::new(Fixed(vec![candle(5_000, 99.0)]), Some(path.clone()), false);
        let got = provider.get_history(&HistoryRequest::daily_year("SPY")).await.unwrap();
        assert_eq!(got, vec![candle(1_000, 50.0)]);

        let refreshing = CachedHistory::new(Fixed(vec![candle(5_000, 99.0)]), Some(path.clone()), true);
        let got = refreshing.get_history(&HistoryRequest::daily_year("SPY")).await.unwrap();
        assert_eq!(got, vec![candle(5_000, 99.0)]);
        assert_eq!(read_cache(&path).unwrap(), vec![candle(5_000, 99.0)]);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn no_cache_path_goes_straight_to_provider() {
        let provider = CachedHistory::new(Fixed(vec![candle(7_000, 10.0)]), None, false);
        let got = provider.get_history(&HistoryRequest::daily_year("SPY")).await.unwrap();
        assert_eq!(got.len(), 1);
    }
}
