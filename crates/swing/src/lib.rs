pub mod market_swing;
pub mod pivot;

pub use market_swing::{MarketSwing, identify_market_swing};
pub use pivot::{SwingKind, SwingPoint, find_candle_swings, find_swing_points};
