use domain::types::Price;
use serde::Serialize;

use crate::PRICE_DP;

/// Expansion target kind
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ObjectiveKind {
    /// Contracted objective point, .618
    #[serde(rename = "COP")]
    Cop,
    /// Objective point, 1.0
    #[serde(rename = "OP")]
    Op,
    /// Expanded objective point, 1.618
    #[serde(rename = "XOP")]
    Xop,
}

impl ObjectiveKind {
    pub const ALL: [ObjectiveKind; 3] = [ObjectiveKind::Cop, ObjectiveKind::Op, ObjectiveKind::Xop];

    pub fn ratio(self) -> f64 {
        match self {
            ObjectiveKind::Cop => 0.618,
            ObjectiveKind::Op => 1.0,
            ObjectiveKind::Xop => 1.618,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ObjectiveKind::Cop => "COP",
            ObjectiveKind::Op => "OP",
            ObjectiveKind::Xop => "XOP",
        }
    }
}

/// Profit target from an ABC pattern
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ObjectivePoint {
    pub price: Price,
    pub ratio: f64,
    pub name: ObjectiveKind,
    pub point_a: Price,
    pub point_b: Price,
    pub point_c: Price,
}

/// `[COP, OP, XOP]` projected from C by `ratio * |B - A|`.
pub fn calculate_objective_points(
    point_a: Price,
    point_b: Price,
    point_c: Price,
    is_uptrend: bool,
) -> [ObjectivePoint; 3] {
    let ab = point_b.distance(point_a);

    ObjectiveKind::ALL.map(|kind| {
        let expansion = kind.ratio() * ab;
        let price = if is_uptrend {
            point_c + expansion
        } else {
            point_c - expansion
        };

        ObjectivePoint {
            price: price.rounded(PRICE_DP),
            ratio: kind.ratio(),
            name: kind,
            point_a,
            point_b,
            point_c,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn uptrend_targets_from_c() {
        let ops = calculate_objective_points(Price(90.0), Price(100.0), Price(95.0), true);

        assert_eq!(ops[0].name, ObjectiveKind::Cop);
        assert!(close(ops[0].price.0, 101.18));
        assert_eq!(ops[1].name, ObjectiveKind::Op);
        assert!(close(ops[1].price.0, 105.0));
        assert_eq!(ops[2].name, ObjectiveKind::Xop);
        assert!(close(ops[2].price.0, 111.18));
    }

    #[test]
    fn downtrend_targets_below_c() {
        let ops = calculate_objective_points(Price(120.0), Price(100.0), Price(110.0), false);

        assert!(close(ops[0].price.0, 97.64));
        assert!(close(ops[1].price.0, 90.0));
        assert!(close(ops[2].price.0, 77.64));
    }

    #[test]
    fn op_is_one_ab_leg_from_c_not_from_b() {
        let ops = calculate_objective_points(Price(50.0), Price(80.0), Price(62.5), true);
        let op = ops[1];

        assert!(close(op.price - op.point_c, 30.0));
        assert!(!close(op.price.0, 110.0));
        assert_eq!(op.ratio, 1.0);
    }

    proptest! {
        #[test]
        fn op_is_always_one_ab_leg_from_c(
            a in 1.0f64..1000.0,
            b in 1.0f64..1000.0,
            c in 1.0f64..1000.0,
            is_uptrend in any::<bool>(),
        ) {
            let ops = calculate_objective_points(Price(a), Price(b), Price(c), is_uptrend);
            let ab = (b - a).abs();

            for op in ops {
                let leg = op.price.distance(op.point_c);
                prop_assert!((leg - op.ratio * ab).abs() <= 1e-4);
            }
            prop_assert!((ops[1].price.distance(Price(c)) - ab).abs() <= 1e-4);
        }
    }
}
