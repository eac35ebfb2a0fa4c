use crate::pivot::SwingPoint;

/// Active market swing: focus number plus the opposite-kind reactions before it
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSwing {
    pub focus: SwingPoint,
    /// most recent first
    pub reactions: Vec<SwingPoint>,
    pub is_uptrend: bool,
}

/// Pick the active swing from the detected swing points.
///
/// Returns `None` when either side is empty. When the latest high and the latest
/// low share an index the swing is treated as a downtrend.
pub fn identify_market_swing(
    swing_highs: &[SwingPoint],
    swing_lows: &[SwingPoint],
) -> Option<MarketSwing> {
    let latest_high = swing_highs.iter().max_by_key(|p| p.index)?;
    let latest_low = swing_lows.iter().max_by_key(|p| p.index)?;

    let (focus, candidates, is_uptrend) = if latest_high.index > latest_low.index {
        (*latest_high, swing_lows, true)
    } else {
        (*latest_low, swing_highs, false)
    };

    let mut reactions: Vec<SwingPoint> = candidates
        .iter()
        .filter(|p| p.index < focus.index)
        .copied()
        .collect();
    reactions.sort_by(|a, b| b.index.cmp(&a.index));

    Some(MarketSwing {
        focus,
        reactions,
        is_uptrend,
    })
}

impl MarketSwing {
    /// Up to `n` most recent reactions
    pub fn recent_reactions(&self, n: usize) -> &[SwingPoint] {
        &self.reactions[..self.reactions.len().min(n)]
    }

    /// Primary reaction, the "A" point of the ABC pattern
    pub fn primary_reaction(&self) -> Option<&SwingPoint> {
        self.reactions.first()
    }

    /// `|focus - min(reaction price)|` over all reactions
    pub fn price_range(&self) -> f64 {
        self.reactions
            .iter()
            .map(|r| r.price.0)
            .reduce(f64::min)
            .map(|lo| (self.focus.price.0 - lo).abs())
            .unwrap_or(0.0)
    }
}
