use domain::round_dp;
use domain::types::Price;
use serde::Serialize;

use crate::fibnode::Fibnode;
use crate::objective::ObjectivePoint;

/// Two Fibnodes from different reactions, one .382 and one .618, within tolerance
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Confluence {
    pub price_low: Price,
    pub price_high: Price,
    pub fibnode_1: Fibnode,
    pub fibnode_2: Fibnode,
    /// 0..1, 1 = exact
    pub strength: f64,
}

/// A Fibnode and an Objective Point within tolerance
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Agreement {
    pub price_low: Price,
    pub price_high: Price,
    pub fibnode: Fibnode,
    pub objective_point: ObjectivePoint,
    pub strength: f64,
}

impl Confluence {
    pub fn midpoint(&self) -> Price {
        self.price_low.midpoint(self.price_high)
    }
}

impl Agreement {
    pub fn midpoint(&self) -> Price {
        self.price_low.midpoint(self.price_high)
    }
}

/// Closeness threshold as a share of the swing range
fn tolerance(price_range: f64, tolerance_pct: f64) -> f64 {
    price_range * (tolerance_pct / 100.0)
}

/// `Some(strength)` when `|p1 - p2| <= tol`
fn aligned(p1: Price, p2: Price, tol: f64) -> Option<f64> {
    let diff = p1.distance(p2);
    if diff > tol {
        return None;
    }

    let strength = if tol > 0.0 { 1.0 - diff / tol } else { 1.0 };
    Some(round_dp(strength, 3))
}

fn band(p1: Price, p2: Price) -> (Price, Price) {
    if p1.0 <= p2.0 { (p1, p2) } else { (p2, p1) }
}

/// Every unordered pair `i < j` with different reactions and mixed ratios.
pub fn find_confluence(
    fibnodes: &[Fibnode],
    price_range: f64,
    tolerance_pct: f64,
) -> Vec<Confluence> {
    let tol = tolerance(price_range, tolerance_pct);
    let mut out = Vec::new();

    for (i, fn1) in fibnodes.iter().enumerate() {
        for fn2 in &fibnodes[i + 1..] {
            if fn1.reaction_idx == fn2.reaction_idx || fn1.ratio == fn2.ratio {
                continue;
            }

            if let Some(strength) = aligned(fn1.price, fn2.price, tol) {
                let (price_low, price_high) = band(fn1.price, fn2.price);
                out.push(Confluence {
                    price_low,
                    price_high,
                    fibnode_1: *fn1,
                    fibnode_2: *fn2,
                    strength,
                });
            }
        }
    }

    out
}

/// Every (Fibnode, Objective Point) pair within tolerance.
pub fn find_agreement(
    fibnodes: &[Fibnode],
    objective_points: &[ObjectivePoint],
    price_range: f64,
    tolerance_pct: f64,
) -> Vec<Agreement> {
    let tol = tolerance(price_range, tolerance_pct);
    let mut out = Vec::new();

    for fibnode in fibnodes {
        for op in objective_points {
            if let Some(strength) = aligned(fibnode.price, op.price, tol) {
                let (price_low, price_high) = band(fibnode.price, op.price);
                out.push(Agreement {
                    price_low,
                    price_high,
                    fibnode: *fibnode,
                    objective_point: *op,
                    strength,
                });
            }
        }
    }

    out
}
