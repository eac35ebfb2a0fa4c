//! DiNapoli level calculators.
//!
//! Retracements (Fibnodes) use only .382 and .618. Expansions (Objective Points)
//! use .618, 1.0 and 1.618 and are always projected from point C.

pub mod alignment;
pub mod fibnode;
pub mod objective;

pub use alignment::{Agreement, Confluence, find_agreement, find_confluence};
pub use fibnode::{FibRatio, Fibnode, calculate_fibnodes};
pub use objective::{ObjectiveKind, ObjectivePoint, calculate_objective_points};

/// Level prices are kept at this many decimals
pub const PRICE_DP: u32 = 4;
