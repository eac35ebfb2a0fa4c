use std::collections::BTreeMap;

use domain::round_dp;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::level_test::{LevelKind, LevelTest};

/// Per level type statistics. held/pierced/broken are % of the touched subset.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct LevelStats {
    pub total: usize,
    pub touched_pct: f64,
    pub held_pct: f64,
    pub pierced_pct: f64,
    pub broken_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stats {
    pub by_level: BTreeMap<LevelKind, LevelStats>,
    pub overall_touched_pct: f64,
    /// held share of touched tests, all types combined
    pub overall_held_pct: f64,
}

#[derive(Default)]
struct Counts {
    total: usize,
    touched: usize,
    held: usize,
    pierced: usize,
    broken: usize,
}

impl Counts {
    fn add(&mut self, t: &LevelTest) {
        self.total += 1;
        self.touched += t.touched as usize;
        self.held += t.held as usize;
        self.pierced += t.pierced as usize;
        self.broken += t.broken as usize;
    }
}

/// `n / d * 100` at one decimal, 0 when `d == 0`
fn pct(n: usize, d: usize) -> f64 {
    if d == 0 {
        return 0.0;
    }
    round_dp(n as f64 / d as f64 * 100.0, 1)
}

/// Group by level type. The result does not depend on the order of `tests`.
pub fn calculate_stats(tests: &[LevelTest]) -> Stats {
    let mut groups: BTreeMap<LevelKind, Counts> = BTreeMap::new();

    for t in tests {
        groups.entry(t.level_type).or_default().add(t);
    }

    let by_level = groups
        .into_iter()
        .map(|(kind, c)| {
            let s = LevelStats {
                total: c.total,
                touched_pct: pct(c.touched, c.total),
                held_pct: pct(c.held, c.touched),
                pierced_pct: pct(c.pierced, c.touched),
                broken_pct: pct(c.broken, c.touched),
            };
            (kind, s)
        })
        .collect();

    let touched = tests.iter().filter(|t| t.touched).count();
    let touched_held = tests.iter().filter(|t| t.touched && t.held).count();

    Stats {
        by_level,
        overall_touched_pct: pct(touched, tests.len()),
        overall_held_pct: pct(touched_held, touched),
    }
}

impl Stats {
    pub fn get(&self, kind: LevelKind) -> Option<&LevelStats> {
        self.by_level.get(&kind)
    }
}

// Flat `{Type}_{metric}` keys, the layout existing snapshot readers expect.
impl Serialize for Stats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.by_level.len() * 5 + 2))?;

        for (kind, s) in &self.by_level {
            let k = kind.as_str();
            map.serialize_entry(&format!("{}_total", k), &s.total)?;
            map.serialize_entry(&format!("{}_touched_pct", k), &s.touched_pct)?;
            map.serialize_entry(&format!("{}_held_pct", k), &s.held_pct)?;
            map.serialize_entry(&format!("{}_pierced_pct", k), &s.pierced_pct)?;
            map.serialize_entry(&format!("{}_broken_pct", k), &s.broken_pct)?;
        }

        map.serialize_entry("overall_touched_pct", &self.overall_touched_pct)?;
        map.serialize_entry("overall_held_pct", &self.overall_held_pct)?;
        map.end()
    }
}
