//! Typing simulation against a multi-layer keyboard layout.
//!
//! Replays text against a layer map to count how often the typist has to
//! leave the base layer and what that costs in switch overhead. Also hosts
//! the thumb-cluster candidate analysis, which ranks keys worth promoting
//! to a thumb position.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::config::SimulatorParams;
use crate::error::{KeymetryError, KmResult};
use crate::optimizer::KeyAssignment;
use crate::snapshot::FrequencySnapshot;

/// Number of firmware layers on the target board.
pub const LAYER_COUNT: usize = 6;

/// Display names for the six firmware layers, in layer order.
pub const LAYER_NAMES: [&str; LAYER_COUNT] = [
    "Base",
    "CodePunc",
    "Numbers",
    "Navigation",
    "App Switch",
    "Function",
];

/// Display name for a layer index, tolerating out-of-range values.
pub fn layer_name(layer: usize) -> &'static str {
    LAYER_NAMES.get(layer).copied().unwrap_or("Unknown")
}

const LEFT_ROWS: [[&str; 6]; 4] = [
    ["esc", "[", "(", "-", ")", "]"],
    ["`", "q", "w", "f", "p", "g"],
    ["+", "a", "r", "s", "t", "d"],
    ["~", "z", "x", "c", "v", "b"],
];

const RIGHT_ROWS: [[&str; 6]; 4] = [
    ["<", "/", "?", "\\", "=", "del"],
    ["j", "l", "u", "y", ";", "|"],
    ["h", "n", "e", "i", "o", "'"],
    ["k", "m", ",", ".", "/", "!"],
];

const THUMB_ROW: [(&str, u8, u8); 9] = [
    ("layer1", 4, 0),
    ("layer2", 4, 1),
    ("space", 4, 2),
    ("enter", 4, 3),
    ("shift", 4, 4),
    ("ctrl", 4, 8),
    ("cmd", 4, 9),
    ("layer3", 4, 10),
    ("alt", 4, 11),
];

/// Maps lowercase symbols to the layer and position that carry them.
///
/// Layer 0 is the physical base layer; layers 1..6 are reached through
/// thumb switches. Lookups walk the layers in order, so a symbol present
/// on the base layer always resolves there even if a higher layer also
/// carries it.
#[derive(Debug, Clone)]
pub struct LayerLookup {
    layers: [HashMap<String, (u8, u8)>; LAYER_COUNT],
}

impl LayerLookup {
    /// A lookup with all six layers empty.
    pub fn empty() -> Self {
        Self {
            layers: std::array::from_fn(|_| HashMap::new()),
        }
    }

    /// The stock base layer of the board, with layers 1..6 left empty.
    ///
    /// Each map is keyed by symbol, so a symbol printed on two keys keeps
    /// only its last position.
    pub fn voyager_default() -> Self {
        let mut lookup = Self::empty();
        for (row, symbols) in LEFT_ROWS.iter().enumerate() {
            for (col, symbol) in symbols.iter().enumerate() {
                lookup.place(0, row as u8, col as u8, symbol);
            }
        }
        for (row, symbols) in RIGHT_ROWS.iter().enumerate() {
            for (col, symbol) in symbols.iter().enumerate() {
                lookup.place(0, row as u8, col as u8 + 6, symbol);
            }
        }
        for (symbol, row, col) in THUMB_ROW {
            lookup.place(0, row, col, symbol);
        }
        lookup
    }

    /// The stock layout with an optimizer plan applied on top.
    pub fn with_assignments(assignments: &[KeyAssignment]) -> Self {
        let mut lookup = Self::voyager_default();
        for assignment in assignments {
            lookup.place(
                assignment.layer as usize,
                assignment.slot.row,
                assignment.slot.col,
                &assignment.symbol,
            );
        }
        lookup
    }

    /// Puts a symbol on a layer. Out-of-range layers are ignored.
    pub fn place(&mut self, layer: usize, row: u8, col: u8, symbol: &str) {
        if let Some(map) = self.layers.get_mut(layer) {
            map.insert(symbol.to_lowercase(), (row, col));
        }
    }

    /// First layer carrying the symbol, matched case-insensitively.
    pub fn find_key_layer(&self, symbol: &str) -> Option<usize> {
        let needle = symbol.to_lowercase();
        self.layers.iter().position(|map| map.contains_key(&needle))
    }

    /// Number of symbols placed on a layer.
    pub fn layer_len(&self, layer: usize) -> usize {
        self.layers.get(layer).map_or(0, HashMap::len)
    }
}

/// Outcome of replaying a text against a [`LayerLookup`].
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    pub text_length: usize,
    pub chars_typed: usize,
    pub layer_switches: u64,
    pub switches_per_100: f64,
    pub overhead_ms: f64,
    pub overhead_per_char_ms: f64,
    pub keys_per_layer: BTreeMap<usize, u64>,
    pub missing_keys: Vec<String>,
    pub layer_distribution: BTreeMap<usize, f64>,
}

/// Efficiency verdict for a layout against recorded typing data.
#[derive(Debug, Clone, Serialize)]
pub struct EfficiencyReport {
    #[serde(flatten)]
    pub simulation: SimulationResult,
    pub efficiency_score: f64,
    pub meets_target: bool,
    pub target_switches_per_100: f64,
    pub recommendations: Vec<String>,
}

/// Side-by-side simulation of two layouts over the same sample.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutComparison {
    pub current: SimulationResult,
    pub candidate: SimulationResult,
    pub improvement: ImprovementDelta,
}

/// Deltas are current minus candidate, so positive means the candidate wins.
#[derive(Debug, Clone, Serialize)]
pub struct ImprovementDelta {
    pub layer_switches: i64,
    pub overhead_ms: f64,
    pub switches_per_100: f64,
}

/// Expands recorded key counts into a replayable text sample.
///
/// Multi-character names like `[space]` cannot be replayed as raw
/// characters, so only single-symbol keys contribute. Each symbol repeats
/// at most `cap` times to keep the sample bounded.
pub fn sample_text(snapshot: &FrequencySnapshot, cap: u64) -> String {
    let mut text = String::new();
    for (symbol, count) in &snapshot.keys {
        if symbol.chars().count() != 1 {
            continue;
        }
        for _ in 0..(*count).min(cap) {
            text.push_str(symbol);
        }
    }
    text
}

/// Replays typing against a layout and scores the result.
pub struct LayerSimulator<'a> {
    lookup: &'a LayerLookup,
    params: &'a SimulatorParams,
}

impl<'a> LayerSimulator<'a> {
    pub fn new(lookup: &'a LayerLookup, params: &'a SimulatorParams) -> Self {
        Self { lookup, params }
    }

    /// Types the text character by character, switching layers as needed.
    ///
    /// The layer is sticky: after a switch the simulator stays on the new
    /// layer until a character forces it elsewhere. Characters absent from
    /// every layer are recorded as missing and excluded from the rates.
    pub fn simulate(&self, text: &str) -> SimulationResult {
        let mut current_layer = 0usize;
        let mut layer_switches = 0u64;
        let mut overhead_ms = 0.0f64;
        let mut keys_per_layer: BTreeMap<usize, u64> = BTreeMap::new();
        let mut missing: Vec<char> = Vec::new();

        for ch in text.chars() {
            let Some(target) = self.lookup.find_key_layer(&ch.to_string()) else {
                missing.push(ch);
                continue;
            };
            if target != current_layer {
                layer_switches += 1;
                overhead_ms += self.params.layer_overhead_ms;
                current_layer = target;
            }
            *keys_per_layer.entry(current_layer).or_insert(0) += 1;
        }

        let text_length = text.chars().count();
        let chars_typed = text_length - missing.len();
        let per_char = |value: f64| {
            if chars_typed > 0 {
                value / chars_typed as f64
            } else {
                0.0
            }
        };

        let layer_distribution = keys_per_layer
            .iter()
            .map(|(layer, count)| (*layer, per_char(*count as f64 * 100.0)))
            .collect();
        let missing_keys: Vec<String> = missing
            .into_iter()
            .collect::<BTreeSet<char>>()
            .into_iter()
            .map(|ch| ch.to_string())
            .collect();

        debug!(
            "🎹 simulated {} chars: {} layer switches, {} missing",
            chars_typed,
            layer_switches,
            missing_keys.len()
        );

        SimulationResult {
            text_length,
            chars_typed,
            layer_switches,
            switches_per_100: per_char(layer_switches as f64 * 100.0),
            overhead_ms,
            overhead_per_char_ms: per_char(overhead_ms),
            keys_per_layer,
            missing_keys,
            layer_distribution,
        }
    }

    /// Simulates a sample expanded from recorded key counts.
    pub fn simulate_snapshot(&self, snapshot: &FrequencySnapshot) -> SimulationResult {
        self.simulate(&sample_text(snapshot, self.params.sample_cap))
    }

    /// Scores the layout against the switch-rate target and collects
    /// placement recommendations.
    pub fn analyze_efficiency(&self, snapshot: &FrequencySnapshot) -> KmResult<EfficiencyReport> {
        let simulation = self.simulate_snapshot(snapshot);
        if simulation.chars_typed == 0 {
            return Err(KeymetryError::Validation(
                "no typeable keystroke data to analyze".to_string(),
            ));
        }

        let target = self.params.switch_target;
        let actual = simulation.switches_per_100;
        let efficiency_score = ((1.0 - actual / target) * 100.0).clamp(0.0, 100.0);
        let recommendations = self.recommendations(&simulation);

        Ok(EfficiencyReport {
            efficiency_score,
            meets_target: actual <= target,
            target_switches_per_100: target,
            recommendations,
            simulation,
        })
    }

    fn recommendations(&self, simulation: &SimulationResult) -> Vec<String> {
        let mut recs = Vec::new();
        if simulation.switches_per_100 > 10.0 {
            recs.push(
                "High layer switching detected. Consider moving frequently used symbols to base layer."
                    .to_string(),
            );
        }
        if simulation.switches_per_100 > self.params.switch_target {
            recs.push(
                "Layer switches exceed target. Review symbol placement and consider thumb key optimization."
                    .to_string(),
            );
        }
        if !simulation.missing_keys.is_empty() {
            let shown = simulation
                .missing_keys
                .iter()
                .take(5)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            recs.push(format!(
                "Missing keys detected: {shown}. Ensure all necessary keys are mapped."
            ));
        }
        let base_share = simulation.layer_distribution.get(&0).copied().unwrap_or(0.0);
        if base_share < 80.0 {
            recs.push(
                "Less than 80% of typing is on base layer. Consider consolidating frequently used keys."
                    .to_string(),
            );
        }
        recs
    }
}

/// Runs both layouts over the same sample and reports the deltas.
pub fn compare_layouts(
    current: &LayerLookup,
    candidate: &LayerLookup,
    snapshot: &FrequencySnapshot,
    params: &SimulatorParams,
) -> LayoutComparison {
    let text = sample_text(snapshot, params.sample_cap);
    let before = LayerSimulator::new(current, params).simulate(&text);
    let after = LayerSimulator::new(candidate, params).simulate(&text);
    let improvement = ImprovementDelta {
        layer_switches: before.layer_switches as i64 - after.layer_switches as i64,
        overhead_ms: before.overhead_ms - after.overhead_ms,
        switches_per_100: before.switches_per_100 - after.switches_per_100,
    };
    LayoutComparison {
        current: before,
        candidate: after,
        improvement,
    }
}

/// Key worth promoting to a thumb-cluster position.
#[derive(Debug, Clone, Serialize)]
pub struct ThumbCandidate {
    pub key: String,
    pub frequency: u64,
    pub reason: String,
    pub score: f64,
}

const SPECIAL_THUMB_KEYS: [(&str, &str); 6] = [
    ("space", "High frequency, essential"),
    ("enter", "High frequency, essential"),
    ("backspace", "High frequency, error correction"),
    ("shift", "Modifier, frequent"),
    ("tab", "Frequent for navigation"),
    ("escape", "Common in vim/coding"),
];

const CONTEXT_THUMB_KEYS: [(&str, &str); 3] = [
    ("(", "Very frequent in Python"),
    ("_", "Common in snake_case"),
    (":", "Frequent in Python"),
];

/// Minimum count before a context symbol is considered for a thumb key.
const CONTEXT_KEY_THRESHOLD: u64 = 100;

/// Ranks thumb-key candidates by recorded frequency.
///
/// Structural keys appear under a bracketed name (`[space]`) or bare,
/// depending on how the logger recorded them; both spellings count.
/// Context symbols score at 0.8x so structural keys win ties.
pub fn thumb_candidates(snapshot: &FrequencySnapshot, top_n: usize) -> Vec<ThumbCandidate> {
    let mut candidates = Vec::new();

    for (key, reason) in SPECIAL_THUMB_KEYS {
        let bracketed = format!("[{key}]");
        let count = snapshot.keys.get(&bracketed).copied().unwrap_or(0)
            + snapshot.keys.get(key).copied().unwrap_or(0);
        if count > 0 {
            candidates.push(ThumbCandidate {
                key: key.to_string(),
                frequency: count,
                reason: reason.to_string(),
                score: count as f64,
            });
        }
    }

    for (key, reason) in CONTEXT_THUMB_KEYS {
        let count = snapshot.keys.get(key).copied().unwrap_or(0);
        if count > CONTEXT_KEY_THRESHOLD {
            candidates.push(ThumbCandidate {
                key: key.to_string(),
                frequency: count,
                reason: reason.to_string(),
                score: count as f64 * 0.8,
            });
        }
    }

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(top_n);
    candidates
}
