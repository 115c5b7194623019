#![allow(dead_code)]

use std::collections::BTreeMap;

use keymetry::device::{PositionSlot, SlotCatalogue, SlotTier};
use keymetry::ergonomics::Finger;
use keymetry::snapshot::{FrequencySnapshot, KeyEvent, TransitionCache};

/// Builds snapshots without hand-writing JSON. `key` keeps
/// `total_keystrokes` in sync; use `keystrokes` to override it.
pub struct SnapshotBuilder {
    snapshot: FrequencySnapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            snapshot: FrequencySnapshot::default(),
        }
    }

    pub fn key(mut self, symbol: &str, count: u64) -> Self {
        self.snapshot.keys.insert(symbol.to_string(), count);
        self.snapshot.total_keystrokes += count;
        self
    }

    pub fn bigram(mut self, pair: &str, count: u64) -> Self {
        self.snapshot.bigrams.insert(pair.to_string(), count);
        self
    }

    pub fn combo(mut self, combo: &str, count: u64) -> Self {
        self.snapshot.combos.insert(combo.to_string(), count);
        self
    }

    pub fn transition(mut self, pair: &str, count: u64, avg_timing: f64) -> Self {
        self.snapshot.transitions.insert(
            pair.to_string(),
            TransitionCache {
                count,
                avg_timing,
                comfort_score: 0.0,
            },
        );
        self
    }

    pub fn sessions(mut self, n: u64) -> Self {
        self.snapshot.total_sessions = n;
        self
    }

    pub fn keystrokes(mut self, n: u64) -> Self {
        self.snapshot.total_keystrokes = n;
        self
    }

    pub fn build(self) -> FrequencySnapshot {
        self.snapshot
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Evenly spaced event stream, one event per symbol.
pub fn sample_events(symbols: &[&str], start_ms: f64, step_ms: f64) -> Vec<KeyEvent> {
    symbols
        .iter()
        .enumerate()
        .map(|(i, symbol)| KeyEvent {
            symbol: symbol.to_string(),
            timestamp_ms: start_ms + step_ms * i as f64,
        })
        .collect()
}

/// Six-slot board: one mirrored prime row, two good slots, one spare.
/// Small enough that placement tests can exhaust it.
pub fn tiny_catalogue() -> SlotCatalogue {
    fn slot(row: u8, col: u8, finger: Finger, score: u8) -> PositionSlot {
        PositionSlot {
            row,
            col,
            finger,
            score,
        }
    }

    let mut tiers = BTreeMap::new();
    tiers.insert(
        SlotTier::Prime,
        vec![
            slot(2, 2, Finger::LeftMiddle, 95),
            slot(2, 7, Finger::RightMiddle, 95),
        ],
    );
    tiers.insert(
        SlotTier::Good,
        vec![
            slot(1, 3, Finger::LeftIndex, 90),
            slot(1, 6, Finger::RightIndex, 90),
        ],
    );
    tiers.insert(
        SlotTier::Acceptable,
        vec![
            slot(3, 3, Finger::LeftIndex, 80),
            slot(3, 6, Finger::RightIndex, 80),
        ],
    );
    SlotCatalogue::from_tiers(tiers)
}

/// Snapshot shaped like a Python-heavy typing log: brackets dominate,
/// underscores and colons follow.
pub fn python_snapshot() -> FrequencySnapshot {
    SnapshotBuilder::new()
        .key("(", 300)
        .key(")", 290)
        .key("_", 250)
        .key(":", 200)
        .key("=", 180)
        .key("\"", 120)
        .key(".", 110)
        .key(",", 90)
        .key("e", 900)
        .key("t", 700)
        .key("[space]", 1200)
        .bigram("()", 150)
        .bigram("==", 60)
        .bigram("th", 220)
        .bigram("he", 180)
        .sessions(12)
        .build()
}
