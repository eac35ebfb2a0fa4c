use crate::types::{Price, Qty, TimestampMs};

/// One traded period. Series are ordered by `ts` ascending and addressed by position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Candle {
    pub ts: TimestampMs,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Qty,
}

impl Candle {
    /// `low <= price <= high`
    pub fn contains(&self, price: Price) -> bool {
        self.low.0 <= price.0 && price.0 <= self.high.0
    }
}

/// High series of a candle slice
pub fn highs(candles: &[Candle]) -> Vec<Price> {
    candles.iter().map(|c| c.high).collect()
}

/// Low series of a candle slice
pub fn lows(candles: &[Candle]) -> Vec<Price> {
    candles.iter().map(|c| c.low).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(low: f64, high: f64) -> Candle {
        Candle {
            ts: TimestampMs(0),
            open: Price(low),
            high: Price(high),
            low: Price(low),
            close: Price(high),
            volume: Qty(1.0),
        }
    }

    #[test]
    fn contains_is_inclusive_on_both_ends() {
        let c = candle(99.0, 101.0);
        assert!(c.contains(Price(99.0)));
        assert!(c.contains(Price(101.0)));
        assert!(c.contains(Price(100.0)));
        assert!(!c.contains(Price(101.01)));
        assert!(!c.contains(Price(98.99)));
    }
}
