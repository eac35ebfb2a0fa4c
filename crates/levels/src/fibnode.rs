use domain::types::Price;
use serde::Serialize;
use swing::pivot::SwingPoint;

use crate::PRICE_DP;

/// Retracement ratio
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FibRatio {
    /// .382
    F3,
    /// .618
    F5,
}

impl FibRatio {
    pub const ALL: [FibRatio; 2] = [FibRatio::F3, FibRatio::F5];

    pub fn value(self) -> f64 {
        match self {
            FibRatio::F3 => 0.382,
            FibRatio::F5 => 0.618,
        }
    }
}

/// Retracement level derived from one reaction and the focus number
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Fibnode {
    pub price: Price,
    pub ratio: FibRatio,
    pub reaction_idx: usize,
    pub reaction_price: Price,
    pub focus_price: Price,
}

/// Two Fibnodes per reaction, in reaction order then `[F3, F5]`.
///
/// Uptrend: `B - r(B - A)`, support below the focus.
/// Downtrend: `B + r(A - B)`, resistance above the focus.
pub fn calculate_fibnodes(
    focus_price: Price,
    reactions: &[SwingPoint],
    is_uptrend: bool,
) -> Vec<Fibnode> {
    let mut out = Vec::with_capacity(reactions.len() * 2);
    let b = focus_price.0;

    for reaction in reactions {
        let a = reaction.price.0;

        for ratio in FibRatio::ALL {
            let r = ratio.value();
            let price = if is_uptrend {
                b - r * (b - a)
            } else {
                b + r * (a - b)
            };

            out.push(Fibnode {
                price: Price(price).rounded(PRICE_DP),
                ratio,
                reaction_idx: reaction.index,
                reaction_price: reaction.price,
                focus_price,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use swing::pivot::SwingKind;

    fn low(price: f64, index: usize) -> SwingPoint {
        SwingPoint {
            price: Price(price),
            index,
            kind: SwingKind::Low,
            ts: None,
        }
    }

    #[test]
    fn uptrend_f3_and_f5() {
        let nodes = calculate_fibnodes(Price(100.0), &[low(90.0, 0)], true);

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].ratio, FibRatio::F3);
        assert!((nodes[0].price.0 - 96.18).abs() < 1e-9);
        assert_eq!(nodes[1].ratio, FibRatio::F5);
        assert!((nodes[1].price.0 - 93.82).abs() < 1e-9);
        assert_eq!(nodes[0].reaction_price, Price(90.0));
        assert_eq!(nodes[0].focus_price, Price(100.0));
    }

    #[test]
    fn downtrend_levels_sit_above_focus() {
        let high = SwingPoint {
            price: Price(120.0),
            index: 4,
            kind: SwingKind::High,
            ts: None,
        };
        let nodes = calculate_fibnodes(Price(100.0), &[high], false);

        assert!((nodes[0].price.0 - 107.64).abs() < 1e-9);
        assert!((nodes[1].price.0 - 112.36).abs() < 1e-9);
        assert!(nodes.iter().all(|n| n.reaction_idx == 4));
    }

    #[test]
    fn order_follows_reactions_then_ratio() {
        let nodes = calculate_fibnodes(Price(100.0), &[low(92.0, 5), low(90.0, 0)], true);

        let tags: Vec<(usize, FibRatio)> = nodes.iter().map(|n| (n.reaction_idx, n.ratio)).collect();
        assert_eq!(
            tags,
            vec![
                (5, FibRatio::F3),
                (5, FibRatio::F5),
                (0, FibRatio::F3),
                (0, FibRatio::F5)
            ]
        );
    }

    #[test]
    fn prices_are_rounded_to_four_decimals() {
        let nodes = calculate_fibnodes(Price(1.23456), &[low(1.11111, 0)], true);
        for n in nodes {
            assert_eq!(n.price.0, domain::round_dp(n.price.0, 4));
        }
    }

    #[test]
    fn no_reactions_no_nodes() {
        assert!(calculate_fibnodes(Price(100.0), &[], true).is_empty());
    }

    proptest! {
        #[test]
        fn every_node_follows_the_retracement_formula(
            focus in 1.0f64..1000.0,
            reaction in 1.0f64..1000.0,
            is_uptrend in any::<bool>(),
        ) {
            let nodes = calculate_fibnodes(Price(focus), &[low(reaction, 0)], is_uptrend);

            prop_assert_eq!(nodes.len(), 2);
            for n in nodes {
                let expected = focus - n.ratio.value() * (focus - reaction);
                prop_assert!((n.price.0 - expected).abs() <= 1e-4);
            }
        }
    }
}
