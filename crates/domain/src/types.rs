//! Core domain types.
//!
//! Goals:
//! - no bare f64 prices in level logic
//! - fix the units in the type
//! - keep rounding rules in one place

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Instrument price
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub f64);

/// Traded volume
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Qty(pub f64);

/// Time in milliseconds (unix epoch)
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimestampMs(pub i64);

//
// --- Rounding ----------------------------------------------------------------
//

/// Round to `dp` decimal places, half away from zero.
pub fn round_dp(x: f64, dp: u32) -> f64 {
    let m = 10f64.powi(dp as i32);
    (x * m).round() / m
}

impl Price {
    pub fn rounded(self, dp: u32) -> Price {
        Price(round_dp(self.0, dp))
    }

    /// Absolute distance between two prices
    pub fn distance(self, other: Price) -> f64 {
        (self.0 - other.0).abs()
    }

    pub fn midpoint(self, other: Price) -> Price {
        Price((self.0 + other.0) / 2.0)
    }
}

//
// --- Arithmetic (kept minimal) -------------------------------------------------
//

impl Add<f64> for Price {
    type Output = Price;
    fn add(self, rhs: f64) -> Price {
        Price(self.0 + rhs)
    }
}

impl Sub<f64> for Price {
    type Output = Price;
    fn sub(self, rhs: f64) -> Price {
        Price(self.0 - rhs)
    }
}

impl Sub for Price {
    type Output = f64;
    fn sub(self, rhs: Price) -> f64 {
        self.0 - rhs.0
    }
}

//
// --- Display (logs / reports) ----------------------------------------------------
//

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl fmt::Display for Qty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
