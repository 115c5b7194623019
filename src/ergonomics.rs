use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    Left,
    Right,
}

#[derive(
    Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Finger {
    LeftPinky,
    LeftRing,
    LeftMiddle,
    LeftIndex,
    LeftThumb,
    RightThumb,
    RightIndex,
    RightMiddle,
    RightRing,
    RightPinky,
}

impl Finger {
    pub fn hand(&self) -> Hand {
        match self {
            Finger::LeftPinky
            | Finger::LeftRing
            | Finger::LeftMiddle
            | Finger::LeftIndex
            | Finger::LeftThumb => Hand::Left,
            _ => Hand::Right,
        }
    }
}

/// Physical location of a key on the reference board.
/// Row 0 is the number row, 2 the home row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPosition {
    pub row: u8,
    pub col: u8,
    pub reach: f64,
}

/// Maps symbols to fingers on a standard QWERTY board and derives
/// the ergonomic aggregates (finger load, SFB rate, hand alternation).
#[derive(Debug, Clone)]
pub struct FingerMap {
    fingers: HashMap<String, Finger>,
    positions: HashMap<String, KeyPosition>,
}

impl FingerMap {
    pub fn standard() -> Self {
        use Finger::*;

        let finger_entries: &[(&str, Finger)] = &[
            // Left hand
            ("q", LeftPinky),
            ("a", LeftPinky),
            ("z", LeftPinky),
            ("1", LeftPinky),
            ("`", LeftPinky),
            ("~", LeftPinky),
            ("tab", LeftPinky),
            ("caps lock", LeftPinky),
            ("shift", LeftPinky),
            ("ctrl", LeftPinky),
            ("esc", LeftPinky),
            ("w", LeftRing),
            ("s", LeftRing),
            ("x", LeftRing),
            ("2", LeftRing),
            ("e", LeftMiddle),
            ("d", LeftMiddle),
            ("c", LeftMiddle),
            ("3", LeftMiddle),
            ("r", LeftIndex),
            ("t", LeftIndex),
            ("f", LeftIndex),
            ("g", LeftIndex),
            ("v", LeftIndex),
            ("b", LeftIndex),
            ("4", LeftIndex),
            ("5", LeftIndex),
            // Right hand
            ("y", RightIndex),
            ("u", RightIndex),
            ("h", RightIndex),
            ("j", RightIndex),
            ("n", RightIndex),
            ("m", RightIndex),
            ("6", RightIndex),
            ("7", RightIndex),
            ("i", RightMiddle),
            ("k", RightMiddle),
            (",", RightMiddle),
            ("8", RightMiddle),
            ("o", RightRing),
            ("l", RightRing),
            (".", RightRing),
            ("9", RightRing),
            ("p", RightPinky),
            (";", RightPinky),
            (":", RightPinky),
            ("/", RightPinky),
            ("?", RightPinky),
            ("'", RightPinky),
            ("\"", RightPinky),
            ("[", RightPinky),
            ("]", RightPinky),
            ("{", RightPinky),
            ("}", RightPinky),
            ("\\", RightPinky),
            ("|", RightPinky),
            ("0", RightPinky),
            ("-", RightPinky),
            ("_", RightPinky),
            ("=", RightPinky),
            ("+", RightPinky),
            ("backspace", RightPinky),
            ("enter", RightPinky),
            // Thumbs (space defaults to left, can be either)
            ("space", LeftThumb),
        ];

        let position_entries: &[(&str, u8, u8, f64)] = &[
            // Home row
            ("a", 2, 0, 0.0),
            ("s", 2, 1, 0.0),
            ("d", 2, 2, 0.0),
            ("f", 2, 3, 0.0),
            ("j", 2, 6, 0.0),
            ("k", 2, 7, 0.0),
            ("l", 2, 8, 0.0),
            (";", 2, 9, 0.0),
            // Top row
            ("q", 1, 0, 0.5),
            ("w", 1, 1, 0.5),
            ("e", 1, 2, 0.5),
            ("r", 1, 3, 0.5),
            ("t", 1, 4, 0.6),
            ("y", 1, 5, 0.6),
            ("u", 1, 6, 0.5),
            ("i", 1, 7, 0.5),
            ("o", 1, 8, 0.5),
            ("p", 1, 9, 0.5),
            // Bottom row
            ("z", 3, 0, 0.7),
            ("x", 3, 1, 0.7),
            ("c", 3, 2, 0.7),
            ("v", 3, 3, 0.7),
            ("b", 3, 4, 0.8),
            ("n", 3, 5, 0.8),
            ("m", 3, 6, 0.7),
            (",", 3, 7, 0.7),
            (".", 3, 8, 0.7),
            ("/", 3, 9, 0.7),
        ];

        let fingers = finger_entries
            .iter()
            .map(|(sym, f)| (sym.to_string(), *f))
            .collect();
        let positions = position_entries
            .iter()
            .map(|(sym, row, col, reach)| {
                (
                    sym.to_string(),
                    KeyPosition {
                        row: *row,
                        col: *col,
                        reach: *reach,
                    },
                )
            })
            .collect();

        Self { fingers, positions }
    }

    pub fn finger_for(&self, symbol: &str) -> Option<Finger> {
        self.fingers.get(&symbol.to_lowercase()).copied()
    }

    pub fn hand_for(&self, symbol: &str) -> Option<Hand> {
        self.finger_for(symbol).map(|f| f.hand())
    }

    pub fn position_for(&self, symbol: &str) -> Option<KeyPosition> {
        self.positions.get(&symbol.to_lowercase()).copied()
    }

    pub fn reach_difficulty(&self, symbol: &str) -> f64 {
        self.position_for(symbol).map(|p| p.reach).unwrap_or(0.5)
    }

    /// Same finger, different symbol. Unmapped symbols never qualify.
    pub fn is_same_finger_bigram(&self, a: &str, b: &str) -> bool {
        match (self.finger_for(a), self.finger_for(b)) {
            (Some(f1), Some(f2)) => f1 == f2 && a.to_lowercase() != b.to_lowercase(),
            _ => false,
        }
    }

    pub fn is_hand_alternation(&self, a: &str, b: &str) -> bool {
        match (self.hand_for(a), self.hand_for(b)) {
            (Some(h1), Some(h2)) => h1 != h2,
            _ => false,
        }
    }

    /// Rows of vertical travel between two keys; 0 when either lacks a
    /// known position.
    pub fn row_jump(&self, a: &str, b: &str) -> u32 {
        match (self.position_for(a), self.position_for(b)) {
            (Some(p1), Some(p2)) => (p1.row as i32 - p2.row as i32).unsigned_abs(),
            _ => 0,
        }
    }

    /// Percentage share of every finger over all counted keystrokes.
    /// Unmapped symbols stay in the denominator, so the shares sum to
    /// 100 only when every symbol maps to a finger.
    pub fn finger_load(&self, freq: &BTreeMap<String, u64>) -> Vec<(Finger, f64)> {
        let mut counts: HashMap<Finger, u64> = HashMap::new();
        let mut total: u64 = 0;

        for (symbol, count) in freq {
            total += count;
            if let Some(finger) = self.finger_for(symbol) {
                *counts.entry(finger).or_insert(0) += count;
            }
        }

        Finger::iter()
            .map(|finger| {
                let share = if total == 0 {
                    0.0
                } else {
                    counts.get(&finger).copied().unwrap_or(0) as f64 / total as f64 * 100.0
                };
                (finger, share)
            })
            .collect()
    }

    pub fn sfb_rate(&self, bigrams: &BTreeMap<String, u64>) -> f64 {
        self.bigram_rate(bigrams, |a, b| self.is_same_finger_bigram(a, b))
    }

    pub fn hand_alternation_rate(&self, bigrams: &BTreeMap<String, u64>) -> f64 {
        self.bigram_rate(bigrams, |a, b| self.is_hand_alternation(a, b))
    }

    fn bigram_rate<F>(&self, bigrams: &BTreeMap<String, u64>, matches: F) -> f64
    where
        F: Fn(&str, &str) -> bool,
    {
        let mut hits: u64 = 0;
        let mut total: u64 = 0;

        for (bigram, count) in bigrams {
            let chars: Vec<char> = bigram.chars().collect();
            if chars.len() < 2 {
                continue;
            }
            let a = chars[0].to_string();
            let b = chars[1].to_string();
            if matches(&a, &b) {
                hits += count;
            }
            total += count;
        }

        if total > 0 {
            hits as f64 / total as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn usage_report(
        &self,
        freq: &BTreeMap<String, u64>,
        bigrams: &BTreeMap<String, u64>,
    ) -> FingerUsageReport {
        let finger_load = self.finger_load(freq);
        let sfb_rate = self.sfb_rate(bigrams);
        let hand_alternation_rate = self.hand_alternation_rate(bigrams);

        let mut sorted = finger_load.clone();
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1));

        let most_used: Vec<(Finger, f64)> = sorted.iter().take(5).copied().collect();
        let least_used: Vec<(Finger, f64)> =
            sorted.iter().rev().take(5).rev().copied().collect();
        let assessment = assess(sfb_rate, hand_alternation_rate, &sorted);

        FingerUsageReport {
            finger_load,
            sfb_rate,
            hand_alternation_rate,
            most_used,
            least_used,
            assessment,
        }
    }
}

impl Default for FingerMap {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FingerUsageReport {
    pub finger_load: Vec<(Finger, f64)>,
    pub sfb_rate: f64,
    pub hand_alternation_rate: f64,
    pub most_used: Vec<(Finger, f64)>,
    pub least_used: Vec<(Finger, f64)>,
    pub assessment: Assessment,
}

#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub overall_score: f64,
}

/// Issue scan plus the 0-100 ergonomic score. `sorted_loads` must be
/// sorted by share descending.
pub fn assess(sfb_rate: f64, hand_alt: f64, sorted_loads: &[(Finger, f64)]) -> Assessment {
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if sfb_rate > 2.0 {
        issues.push(format!(
            "High same-finger bigram rate: {:.2}% (target: <2%)",
            sfb_rate
        ));
        recommendations
            .push("Consider reorganizing common bigrams to use different fingers".to_string());
    }

    if hand_alt < 60.0 {
        issues.push(format!(
            "Low hand alternation: {:.2}% (target: >60%)",
            hand_alt
        ));
        recommendations.push("Move frequently used keys to alternate between hands".to_string());
    }

    if let (Some((heaviest, max_load)), Some((_, min_load))) =
        (sorted_loads.first(), sorted_loads.last())
    {
        if *max_load > 20.0 && max_load / min_load.max(0.1) > 5.0 {
            issues.push(format!("Unbalanced finger usage: {} is overused", heaviest));
            recommendations.push(format!("Redistribute load from {}", heaviest));
        }
    }

    Assessment {
        issues,
        recommendations,
        overall_score: ergonomic_score(sfb_rate, hand_alt),
    }
}

fn ergonomic_score(sfb_rate: f64, hand_alt: f64) -> f64 {
    let mut score = 100.0;
    if sfb_rate > 2.0 {
        score -= (sfb_rate - 2.0) * 10.0;
    }
    if hand_alt < 60.0 {
        score -= (60.0 - hand_alt) * 0.5;
    }
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingers_resolve_case_insensitively() {
        let map = FingerMap::standard();
        assert_eq!(map.finger_for("Q"), Some(Finger::LeftPinky));
        assert_eq!(map.finger_for("q"), Some(Finger::LeftPinky));
        assert_eq!(map.finger_for("\u{1f600}"), None);
    }

    #[test]
    fn same_symbol_is_not_a_same_finger_bigram() {
        let map = FingerMap::standard();
        assert!(!map.is_same_finger_bigram("a", "a"));
        assert!(!map.is_same_finger_bigram("a", "A"));
        assert!(map.is_same_finger_bigram("a", "q"));
    }

    #[test]
    fn row_jump_defaults_to_zero_for_unknown_positions() {
        let map = FingerMap::standard();
        assert_eq!(map.row_jump("q", "z"), 2);
        assert_eq!(map.row_jump("q", "1"), 0);
        assert_eq!(map.row_jump("space", "a"), 0);
    }

    #[test]
    fn reach_difficulty_falls_back_to_half() {
        let map = FingerMap::standard();
        assert_eq!(map.reach_difficulty("a"), 0.0);
        assert_eq!(map.reach_difficulty("b"), 0.8);
        assert_eq!(map.reach_difficulty("space"), 0.5);
    }
}
