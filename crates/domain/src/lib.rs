pub mod candle;
pub mod types;

pub use candle::Candle;
pub use types::{Price, Qty, TimestampMs, round_dp};
