use domain::candle::Candle;
use domain::types::{Price, TimestampMs};
use serde::Serialize;

/// Swing point kind
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingKind {
    High,
    Low,
}

/// Confirmed local extremum
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct SwingPoint {
    pub price: Price,
    pub index: usize,
    pub kind: SwingKind,
    pub ts: Option<TimestampMs>,
}

impl SwingPoint {
    pub fn is_high(&self) -> bool {
        self.kind == SwingKind::High
    }
}

/// `series[i]` is strictly above every other value in `[i-k, i+k]`
fn is_swing_high(series: &[Price], i: usize, k: usize) -> bool {
    if i < k || i + k >= series.len() {
        return false;
    }

    let hi = series[i].0;

    series[i - k..i].iter().all(|p| p.0 < hi) && series[i + 1..=i + k].iter().all(|p| p.0 < hi)
}

/// `series[i]` is strictly below every other value in `[i-k, i+k]`
fn is_swing_low(series: &[Price], i: usize, k: usize) -> bool {
    if i < k || i + k >= series.len() {
        return false;
    }

    let lo = series[i].0;

    series[i - k..i].iter().all(|p| p.0 > lo) && series[i + 1..=i + k].iter().all(|p| p.0 > lo)
}

/// Swing highs and swing lows in ascending index order.
///
/// Ties inside the window disqualify a bar. Series shorter than `2 * lookback + 1`
/// yield nothing. `lookback == 0` makes every bar a swing.
pub fn find_swing_points(
    highs: &[Price],
    lows: &[Price],
    lookback: usize,
) -> (Vec<SwingPoint>, Vec<SwingPoint>) {
    let len = highs.len().min(lows.len());
    let mut swing_highs = Vec::new();
    let mut swing_lows = Vec::new();

    for i in lookback..len.saturating_sub(lookback) {
        if is_swing_high(&highs[..len], i, lookback) {
            swing_highs.push(SwingPoint {
                price: highs[i],
                index: i,
                kind: SwingKind::High,
                ts: None,
            });
        }

        if is_swing_low(&lows[..len], i, lookback) {
            swing_lows.push(SwingPoint {
                price: lows[i],
                index: i,
                kind: SwingKind::Low,
                ts: None,
            });
        }
    }

    (swing_highs, swing_lows)
}

/// Same as [`find_swing_points`] over a candle series, with timestamps attached.
pub fn find_candle_swings(
    candles: &[Candle],
    lookback: usize,
) -> (Vec<SwingPoint>, Vec<SwingPoint>) {
    let highs = domain::candle::highs(candles);
    let lows = domain::candle::lows(candles);
    let (mut swing_highs, mut swing_lows) = find_swing_points(&highs, &lows, lookback);

    for p in swing_highs.iter_mut().chain(swing_lows.iter_mut()) {
        p.ts = Some(candles[p.index].ts);
    }

    (swing_highs, swing_lows)
}
