//! Levels of the current market swing, with step-by-step arithmetic.

use anyhow::{Result, bail};
use backtest::config::BacktestConfig;
use backtest::result::format_date;
use domain::candle::Candle;
use domain::types::Price;
use levels::{
    Confluence, FibRatio, Fibnode, ObjectivePoint, calculate_fibnodes,
    calculate_objective_points, find_confluence,
};
use swing::market_swing::{MarketSwing, identify_market_swing};
use swing::pivot::{SwingPoint, find_candle_swings};

/// Reactions used for the report Fibnodes
const REPORT_REACTIONS: usize = 3;
/// Most recent swing points listed per side
const LISTED_SWINGS: usize = 5;

#[derive(Debug, Clone)]
pub struct LevelsReport {
    pub symbol: String,
    pub candles: usize,
    pub first_ts: String,
    pub last_ts: String,
    pub swing_highs: Vec<(String, SwingPoint)>,
    pub swing_lows: Vec<(String, SwingPoint)>,
    pub swing: MarketSwing,
    pub fibnodes: Vec<Fibnode>,
    pub confluences: Vec<Confluence>,
    pub objective_points: [ObjectivePoint; 3],
    pub current_price: Price,
}

fn dated(candles: &[Candle], points: &[SwingPoint]) -> Vec<(String, SwingPoint)> {
    let skip = points.len().saturating_sub(LISTED_SWINGS);
    points[skip..]
        .iter()
        .map(|p| (format_date(candles[p.index].ts), *p))
        .collect()
}

/// `delta` as % of the current price
fn pct_of(delta: f64, current: Price) -> f64 {
    if current.0 == 0.0 {
        return 0.0;
    }
    delta / current.0 * 100.0
}

impl LevelsReport {
    pub fn build(symbol: &str, candles: &[Candle], config: &BacktestConfig) -> Result<Self> {
        let (Some(first), Some(last)) = (candles.first(), candles.last()) else {
            bail!("No data returned for {}", symbol);
        };

        let (swing_highs, swing_lows) = find_candle_swings(candles, config.swing_lookback);
        let Some(swing) = identify_market_swing(&swing_highs, &swing_lows) else {
            bail!(
                "no market swing: {} swing highs, {} swing lows",
                swing_highs.len(),
                swing_lows.len()
            );
        };
        let Some(point_a) = swing.primary_reaction().copied() else {
            bail!("focus at bar {} has no reactions", swing.focus.index);
        };

        let reactions = swing.recent_reactions(REPORT_REACTIONS);
        let fibnodes = calculate_fibnodes(swing.focus.price, reactions, swing.is_uptrend);

        let lowest = reactions
            .iter()
            .map(|r| r.price.0)
            .fold(f64::INFINITY, f64::min);
        let price_range = (swing.focus.price.0 - lowest).abs();
        let confluences = find_confluence(&fibnodes, price_range, config.confluence_tolerance_pct);

        // point C: first .618 retracement
        let point_c = fibnodes
            .iter()
            .find(|f| f.ratio == FibRatio::F5)
            .map(|f| f.price)
            .unwrap_or_else(|| {
                let (a, b) = (point_a.price.0, swing.focus.price.0);
                Price(b - FibRatio::F5.value() * (b - a))
            });
        let objective_points = calculate_objective_points(
            point_a.price,
            swing.focus.price,
            point_c,
            swing.is_uptrend,
        );

        Ok(Self {
            symbol: symbol.to_string(),
            candles: candles.len(),
            first_ts: format_date(first.ts),
            last_ts: format_date(last.ts),
            swing_highs: dated(candles, &swing_highs),
            swing_lows: dated(candles, &swing_lows),
            swing,
            fibnodes,
            confluences,
            objective_points,
            current_price: last.close,
        })
    }

    pub fn render(&self) -> String {
        let heavy = "=".repeat(70);
        let light = "-".repeat(70);
        let mut out = Vec::new();

        out.push(heavy.clone());
        out.push(format!("DINAPOLI LEVELS FOR {}", self.symbol));
        out.push(heavy.clone());
        out.push(format!("Analyzing {} candles", self.candles));
        out.push(format!("Date range: {} to {}", self.first_ts, self.last_ts));

        out.push(String::new());
        out.push(light.clone());
        out.push("SWING POINTS".to_string());
        out.push(light.clone());
        out.push(format!("Swing highs (last {}):", self.swing_highs.len()));
        for (date, p) in &self.swing_highs {
            out.push(format!("  {}: {}", date, p.price));
        }
        out.push(format!("Swing lows (last {}):", self.swing_lows.len()));
        for (date, p) in &self.swing_lows {
            out.push(format!("  {}: {}", date, p.price));
        }

        let trend = if self.swing.is_uptrend { "UPTREND" } else { "DOWNTREND" };
        out.push(String::new());
        out.push(format!("Current trend: {}", trend));
        out.push(format!("Focus number (B): {}", self.swing.focus.price));
        for (i, r) in self.swing.recent_reactions(REPORT_REACTIONS).iter().enumerate() {
            let marker = if i == 0 { " (*)" } else { "" };
            out.push(format!("  R{}{}: {}", i + 1, marker, r.price));
        }

        out.push(String::new());
        out.push(light.clone());
        out.push("FIBNODES (distance = current - level)".to_string());
        out.push(light.clone());
        let mut fibnodes = self.fibnodes.clone();
        fibnodes.sort_by(|a, b| b.price.0.total_cmp(&a.price.0));
        for f in &fibnodes {
            let (a, b) = (f.reaction_price.0, f.focus_price.0);
            out.push(format!(
                "  {:?} ({}) from reaction {:.2}: {:.2} - {}*({:.2} - {:.2}) = {}  [{:+.1}% from current]",
                f.ratio,
                f.ratio.value(),
                a,
                b,
                f.ratio.value(),
                b,
                a,
                f.price,
                pct_of(self.current_price - f.price, self.current_price),
            ));
        }

        out.push(String::new());
        if self.confluences.is_empty() {
            out.push("No confluence (fibnodes not close enough)".to_string());
        }
        for c in &self.confluences {
            out.push(format!(
                "  Confluence {} - {} (strength {:.0}%)  [{:+.1}% from current]",
                c.price_low,
                c.price_high,
                c.strength * 100.0,
                pct_of(self.current_price - c.midpoint(), self.current_price),
            ));
        }

        out.push(String::new());
        out.push(light.clone());
        out.push("OBJECTIVE POINTS (distance = level - current)".to_string());
        out.push(light);
        let first = &self.objective_points[0];
        out.push(format!(
            "  A = {}, B = {}, C = {}, AB = {:.2}",
            first.point_a,
            first.point_b,
            first.point_c,
            first.point_b.distance(first.point_a)
        ));
        for op in &self.objective_points {
            out.push(format!(
                "  {}: {}*|B - A| + C = {}  [{:+.1}% from current]",
                op.name.name(),
                op.ratio,
                op.price,
                pct_of(op.price - self.current_price, self.current_price),
            ));
        }

        out.push(String::new());
        out.push(heavy);
        out.push(format!("Current price: {}", self.current_price));

        out.join("\n")
    }
}
