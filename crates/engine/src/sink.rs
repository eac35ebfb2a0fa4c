use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use backtest::level_test::LevelKind;
use backtest::result::BacktestResult;
use tracing::info;

/// Consumer of a finished backtest
pub trait ResultSink {
    fn consume(&mut self, result: &BacktestResult) -> Result<()>;
}

/// Human readable report on stdout
pub struct ConsoleSink;

/// Field-for-field JSON snapshot
pub struct JsonSink {
    pub path: String,
}

impl ResultSink for ConsoleSink {
    fn consume(&mut self, result: &BacktestResult) -> Result<()> {
        println!("{}", format_results(result));
        Ok(())
    }
}

impl ResultSink for JsonSink {
    fn consume(&mut self, result: &BacktestResult) -> Result<()> {
        save_results_json(result, &self.path)?;
        info!(path = %self.path, "results saved");
        Ok(())
    }
}

const WIDE: usize = 70;

pub fn format_results(result: &BacktestResult) -> String {
    let heavy = "=".repeat(WIDE);
    let light = "-".repeat(WIDE);

    let mut lines = vec![
        heavy.clone(),
        "DINAPOLI LEVELS BACKTEST RESULTS".to_string(),
        heavy,
        format!("Symbol: {}", result.symbol),
        format!(
            "Period: {} ({} to {})",
            result.period, result.start_date, result.end_date
        ),
        format!("Candles: {}", result.candle_count),
        format!("Swings Analyzed: {}", result.swing_count),
        format!("Total Levels Tested: {}", result.total_levels_tested),
        String::new(),
        light.clone(),
        "STATISTICS BY LEVEL TYPE".to_string(),
        light.clone(),
    ];

    for kind in LevelKind::ALL {
        let Some(s) = result.stats.get(kind) else {
            continue;
        };
        lines.push(format!("\n{}:", kind));
        lines.push(format!("  Total Levels: {}", s.total));
        lines.push(format!("  Touched: {:.1}%", s.touched_pct));
        lines.push(format!("  Held (when touched): {:.1}%", s.held_pct));
        lines.push(format!("  Pierced: {:.1}%", s.pierced_pct));
        lines.push(format!("  Broken: {:.1}%", s.broken_pct));
    }

    lines.extend([
        String::new(),
        light.clone(),
        "OVERALL STATISTICS".to_string(),
        light,
        format!("Overall Touched: {:.1}%", result.stats.overall_touched_pct),
        format!("Overall Held: {:.1}%", result.stats.overall_held_pct),
    ]);

    lines.join("\n")
}

/// `backtest_{symbol}_{start}_{end}.json`
pub fn default_json_path(result: &BacktestResult) -> String {
    format!(
        "backtest_{}_{}_{}.json",
        result.symbol, result.start_date, result.end_date
    )
}

pub fn save_results_json(result: &BacktestResult, path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path).with_context(|| format!("create {} failed", path))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, result).context("serialize results failed")?;
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use backtest::level_test::LevelTest;
    use backtest::stats::calculate_stats;
    use domain::types::Price;

    fn result() -> BacktestResult {
        let levels = vec![
            LevelTest {
                level_type: LevelKind::F5,
                price: Price(97.5),
                touched: true,
                held: true,
                pierced: false,
                broken: false,
                touch_count: 2,
                first_touch_index: Some(3),
                max_pierce_pct: 0.0,
            },
            LevelTest {
                level_type: LevelKind::Xop,
                price: Price(120.0),
                touched: false,
                held: false,
                pierced: false,
                broken: false,
                touch_count: 0,
                first_touch_index: None,
                max_pierce_pct: 0.0,
            },
        ];

        BacktestResult {
            symbol: "SPY".into(),
            period: "1 year(s)".into(),
            start_date: "2024-01-02".into(),
            end_date: "2024-12-31".into(),
            candle_count: 251,
            swing_count: 1,
            total_levels_tested: levels.len(),
            stats: calculate_stats(&levels),
            levels,
        }
    }

    #[test]
    fn report_lists_only_present_types_in_order() {
        let text = format_results(&result());

        assert!(text.contains("Symbol: SPY"));
        assert!(text.contains("Period: 1 year(s) (2024-01-02 to 2024-12-31)"));
        assert!(text.contains("Swings Analyzed: 1"));
        assert!(text.contains("\nF5:\n  Total Levels: 1\n  Touched: 100.0%"));
        assert!(text.contains("Overall Touched: 50.0%"));
        assert!(text.contains("Overall Held: 100.0%"));
        assert!(!text.contains("\nF3:"));

        let f5 = text.find("\nF5:").unwrap();
        let xop = text.find("\nXOP:").unwrap();
        assert!(f5 < xop);
    }

    #[test]
    fn json_snapshot_has_expected_fields() {
        let r = result();
        let path = std::env::temp_dir()
            .join(format!("dinapoli-sink-{}", std::process::id()))
            .join(default_json_path(&r));
        let path = path.to_string_lossy().into_owned();

        JsonSink { path: path.clone() }.consume(&r).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();

        for key in [
            "symbol",
            "period",
            "start_date",
            "end_date",
            "candle_count",
            "swing_count",
            "total_levels_tested",
            "stats",
            "levels",
        ] {
            assert!(v.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(v["levels"][0]["level_type"], "F5");
        assert_eq!(v["levels"][0]["first_touch_idx"], 3);
        assert_eq!(v["levels"][1]["level_type"], "XOP");
        assert_eq!(v["stats"]["F5_held_pct"], 100.0);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn default_path_uses_symbol_and_dates() {
        assert_eq!(
            default_json_path(&result()),
            "backtest_SPY_2024-01-02_2024-12-31.json"
        );
    }
}
