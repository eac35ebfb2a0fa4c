use domain::candle::Candle;
use domain::types::Price;
use levels::{
    Fibnode, calculate_fibnodes, calculate_objective_points, find_agreement, find_confluence,
};
use swing::market_swing::{MarketSwing, identify_market_swing};
use swing::pivot::{SwingPoint, find_candle_swings};
use tracing::debug;

use crate::config::BacktestConfig;
use crate::level_test::{LevelKind, LevelTest, test_level};

/// Why an as-of snapshot contributed nothing
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SnapshotSkip {
    /// fewer than 2 swing highs or no swing low yet
    InsufficientSwingData { highs: usize, lows: usize },
    /// no focus, or a focus without reactions
    NoActiveSwing,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineOutput {
    pub swing_count: usize,
    pub levels: Vec<LevelTest>,
}

/// Classify the swing visible at `as_of`, using only swings at or before it.
pub fn snapshot_swing(
    swing_highs: &[SwingPoint],
    swing_lows: &[SwingPoint],
    as_of: usize,
) -> Result<MarketSwing, SnapshotSkip> {
    let highs = &swing_highs[..swing_highs.partition_point(|p| p.index <= as_of)];
    let lows = &swing_lows[..swing_lows.partition_point(|p| p.index <= as_of)];

    if highs.len() < 2 || lows.is_empty() {
        return Err(SnapshotSkip::InsufficientSwingData {
            highs: highs.len(),
            lows: lows.len(),
        });
    }

    match identify_market_swing(highs, lows) {
        Some(swing) if !swing.reactions.is_empty() => Ok(swing),
        _ => Err(SnapshotSkip::NoActiveSwing),
    }
}

/// First bar among the leading `n` whose range contains any Fibnode
fn find_point_c(window: &[Candle], fibnodes: &[Fibnode], n: usize) -> Option<(usize, Price)> {
    window.iter().take(n).enumerate().find_map(|(j, c)| {
        fibnodes
            .iter()
            .find(|f| c.contains(f.price))
            .map(|f| (j, f.price))
    })
}

/// Derive every level of one swing and test it on the candles after the focus.
pub fn test_swing(candles: &[Candle], swing: &MarketSwing, config: &BacktestConfig) -> Vec<LevelTest> {
    let focus = swing.focus;
    let is_support = swing.is_uptrend;
    let pierce = config.pierce_tolerance_pct;

    let fibnodes = calculate_fibnodes(
        focus.price,
        swing.recent_reactions(config.max_reactions),
        swing.is_uptrend,
    );
    let price_range = swing.price_range();
    let confluences = find_confluence(&fibnodes, price_range, config.confluence_tolerance_pct);

    let start = (focus.index + 1).min(candles.len());
    let end = (start + config.test_window).min(candles.len());
    let window = &candles[start..end];

    let mut out = Vec::with_capacity(fibnodes.len() + confluences.len() + 3);

    for f in &fibnodes {
        out.push(test_level(f.price, f.ratio.into(), window, is_support, pierce));
    }

    for c in &confluences {
        out.push(test_level(c.midpoint(), LevelKind::Confluence, window, is_support, pierce));
    }

    let Some((c_idx, c_price)) = find_point_c(window, &fibnodes, config.point_c_window) else {
        return out;
    };
    let Some(point_a) = swing.primary_reaction() else {
        return out;
    };

    let ops = calculate_objective_points(point_a.price, focus.price, c_price, swing.is_uptrend);

    // targets, not support/resistance
    for op in &ops {
        out.push(test_level(op.price, op.name.into(), &window[c_idx..], false, pierce));
    }

    let agreements = find_agreement(&fibnodes, &ops, price_range, config.confluence_tolerance_pct);
    for a in &agreements {
        out.push(test_level(a.midpoint(), LevelKind::Agreement, window, is_support, pierce));
    }

    debug!(
        focus_idx = focus.index,
        point_c_idx = start + c_idx,
        confluences = confluences.len(),
        agreements = agreements.len(),
        "objective points tested"
    );

    out
}

/// Replay every swing-high snapshot of the series and collect all level tests.
pub fn collect_level_tests(candles: &[Candle], config: &BacktestConfig) -> EngineOutput {
    let (swing_highs, swing_lows) = find_candle_swings(candles, config.swing_lookback);

    debug!(
        highs = swing_highs.len(),
        lows = swing_lows.len(),
        "swing points detected"
    );

    let mut output = EngineOutput::default();

    for as_of in &swing_highs {
        match snapshot_swing(&swing_highs, &swing_lows, as_of.index) {
            Ok(swing) => {
                output.swing_count += 1;
                output.levels.extend(test_swing(candles, &swing, config));
            }
            Err(skip) => {
                debug!(as_of = as_of.index, ?skip, "snapshot skipped");
            }
        }
    }

    output
}
