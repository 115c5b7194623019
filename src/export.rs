//! Oryx-compatible layout export and the markdown deliverables that
//! travel with it.
//!
//! The wire document is what the downstream configurator imports: six
//! dense 52-key layers of QMK keycodes plus metadata. The rationale and
//! cheatsheet renderers exist so the typist can see why every key landed
//! where it did.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::KmResult;
use crate::keycodes::{KeycodeTable, TRANSPARENT};
use crate::optimizer::{symbol_frequencies, KeyAssignment};
use crate::patterns::MacroSuggestion;
use crate::simulator::{layer_name, LAYER_COUNT};
use crate::snapshot::FrequencySnapshot;

/// Physical key count of the target board, both hands included.
pub const DEVICE_KEY_COUNT: usize = 52;

/// Dense per-layer wire map. Every index is populated from the start;
/// unassigned positions hold the transparent sentinel.
#[derive(Debug, Clone)]
pub struct LayerMap {
    keys: Vec<String>,
}

impl LayerMap {
    pub fn transparent() -> Self {
        Self {
            keys: vec![TRANSPARENT.to_string(); DEVICE_KEY_COUNT],
        }
    }

    /// Puts a wire code at an index. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, code: String) {
        if index < DEVICE_KEY_COUNT {
            self.keys[index] = code;
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    fn into_keys(self) -> Vec<String> {
        self.keys
    }
}

/// One layer of the wire document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OryxLayer {
    pub id: u8,
    pub name: String,
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OryxMetadata {
    pub name: String,
    pub generated: String,
    pub generator: String,
    pub description: String,
}

/// Complete configurator import document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OryxDocument {
    pub version: u32,
    pub uid: String,
    pub layers: Vec<OryxLayer>,
    pub metadata: OryxMetadata,
}

/// Five alphanumeric characters, enough to tell exports apart.
pub fn random_uid(rng: &mut fastrand::Rng) -> String {
    (0..5).map(|_| rng.alphanumeric()).collect()
}

/// Serializes optimizer output for the configurator and renders the
/// human-readable companions.
#[derive(Debug, Clone)]
pub struct LayoutExporter {
    layout_name: String,
    keycodes: KeycodeTable,
}

impl LayoutExporter {
    pub fn new(layout_name: &str) -> Self {
        Self {
            layout_name: layout_name.to_string(),
            keycodes: KeycodeTable::with_defaults(),
        }
    }

    /// Assembles the wire document from an assignment list.
    ///
    /// `uid` and `generated` are injected so the assembly stays pure;
    /// [`LayoutExporter::export`] fills them for normal use.
    pub fn build_document(
        &self,
        assignments: &[KeyAssignment],
        uid: String,
        generated: String,
    ) -> OryxDocument {
        let mut maps: Vec<LayerMap> = (0..LAYER_COUNT).map(|_| LayerMap::transparent()).collect();
        for assignment in assignments {
            if let Some(map) = maps.get_mut(assignment.layer as usize) {
                map.set(
                    assignment.slot.position_index(),
                    self.keycodes.wire_code(&assignment.symbol),
                );
            }
        }

        let layers = maps
            .into_iter()
            .enumerate()
            .map(|(id, map)| OryxLayer {
                id: id as u8,
                name: layer_name(id).to_string(),
                keys: map.into_keys(),
            })
            .collect();

        OryxDocument {
            version: 1,
            uid,
            layers,
            metadata: OryxMetadata {
                name: self.layout_name.clone(),
                generated,
                generator: format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                description: "Optimized layout based on keystroke analysis".to_string(),
            },
        }
    }

    /// Builds a document with a fresh uid and the current timestamp.
    pub fn export(&self, assignments: &[KeyAssignment], rng: &mut fastrand::Rng) -> OryxDocument {
        self.build_document(assignments, random_uid(rng), Utc::now().to_rfc3339())
    }

    pub fn write_json(&self, document: &OryxDocument, path: &Path) -> KmResult<()> {
        let json = serde_json::to_string_pretty(document)?;
        fs::write(path, json)?;
        info!("💾 layout exported to {}", path.display());
        Ok(())
    }

    /// Markdown document explaining every placement decision.
    pub fn render_rationale(
        &self,
        snapshot: &FrequencySnapshot,
        assignments: &[KeyAssignment],
        context: &str,
    ) -> String {
        let mut md = String::new();
        md.push_str("# Optimized Voyager Layout Rationale\n\n");
        md.push_str(&format!("**Context**: {}\n", capitalize(context)));
        md.push_str(&format!(
            "**Total keystrokes analyzed**: {}\n\n",
            thousands(snapshot.total_keystrokes)
        ));

        md.push_str("## Key Placement Decisions\n\n");
        for (layer, mut keys) in group_by_layer(assignments) {
            md.push_str(&format!("### Layer {layer}\n\n"));
            md.push_str("| Key | Position | Finger | Tier | Frequency | Reason |\n");
            md.push_str("|-----|----------|--------|------|-----------|--------|\n");
            keys.sort_by(|a, b| b.frequency.cmp(&a.frequency));
            for assignment in keys {
                md.push_str(&format!(
                    "| `{}` | ({},{}) | {} | {} | {} | {} |\n",
                    assignment.symbol,
                    assignment.slot.row,
                    assignment.slot.col,
                    assignment.slot.finger,
                    assignment.tier,
                    assignment.frequency,
                    assignment.reason
                ));
            }
            md.push('\n');
        }

        md.push_str("## Statistics\n\n");
        let symbol_freq = symbol_frequencies(snapshot);
        let total_symbols: u64 = symbol_freq.values().sum();
        md.push_str(&format!(
            "- Total symbol keystrokes: {}\n",
            thousands(total_symbols)
        ));
        md.push_str(&format!("- Unique symbols: {}\n", symbol_freq.len()));
        let mut ranked: Vec<(&String, &u64)> = symbol_freq.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1));
        let top = ranked
            .iter()
            .take(5)
            .map(|(symbol, count)| format!("`{symbol}` ({count})"))
            .collect::<Vec<_>>()
            .join(", ");
        md.push_str(&format!("- Top 5 symbols: {top}\n"));
        if !snapshot.finger_stats.finger_load.is_empty() {
            md.push_str(&format!(
                "- Same-finger bigram rate: {:.2}%\n",
                snapshot.finger_stats.sfb_rate
            ));
            md.push_str(&format!(
                "- Hand alternation rate: {:.2}%\n",
                snapshot.finger_stats.hand_alternation_rate
            ));
        }

        md.push_str("\n## Recommendations\n\n");
        md.push_str("1. Practice the new symbol positions in isolation before full-speed typing\n");
        md.push_str("2. Print this layout and keep it visible during the adaptation period\n");
        md.push_str("3. Track your progress weekly to measure improvement\n");
        md.push_str("4. Consider adding macros for the highest frequency patterns\n");
        md
    }

    /// Printable per-layer cheatsheet with key grids, placement reasons,
    /// and the macro suggestions worth binding.
    pub fn render_cheatsheet(
        &self,
        assignments: &[KeyAssignment],
        macros: &[MacroSuggestion],
    ) -> String {
        let mut md = format!("# {} - Cheatsheet\n\n", self.layout_name);
        md.push_str(&format!("*Generated: {}*\n\n", Utc::now().format("%Y-%m-%d")));

        for (layer, mut keys) in group_by_layer(assignments) {
            md.push_str(&format!("## Layer {layer}\n\n"));

            // 5x12 grid, thumb row last; only the finger rows render
            let mut grid = [[' '; 12]; 5];
            for assignment in &keys {
                let row = assignment.slot.row as usize;
                let col = assignment.slot.col as usize;
                if row < 5 && col < 12 {
                    if let Some(ch) = assignment.symbol.chars().next() {
                        grid[row][col] = ch;
                    }
                }
            }

            md.push_str("```\nLEFT HAND:\n");
            for row in &grid[..4] {
                md.push_str(&join_cells(&row[..6]));
                md.push('\n');
            }
            md.push_str("\nRIGHT HAND:\n");
            for row in &grid[..4] {
                md.push_str(&join_cells(&row[6..]));
                md.push('\n');
            }
            md.push_str("```\n\n### Keys\n\n");

            keys.sort_by(|a, b| b.frequency.cmp(&a.frequency));
            for assignment in keys {
                md.push_str(&format!(
                    "- **{}**: {} ({} uses)\n",
                    assignment.symbol, assignment.reason, assignment.frequency
                ));
            }
            md.push('\n');
        }

        if !macros.is_empty() {
            md.push_str("## Macro Suggestions\n\n");
            md.push_str("| Pattern | Count | Keystrokes saved | Recommended |\n");
            md.push_str("|---------|-------|------------------|-------------|\n");
            for suggestion in macros {
                md.push_str(&format!(
                    "| `{}` | {} | {} | {} |\n",
                    suggestion.pattern,
                    suggestion.frequency,
                    suggestion.keystrokes_saved,
                    if suggestion.recommended { "yes" } else { "no" }
                ));
            }
            md.push('\n');
        }

        md
    }
}

fn group_by_layer(assignments: &[KeyAssignment]) -> BTreeMap<u8, Vec<&KeyAssignment>> {
    let mut by_layer: BTreeMap<u8, Vec<&KeyAssignment>> = BTreeMap::new();
    for assignment in assignments {
        by_layer.entry(assignment.layer).or_default().push(assignment);
    }
    by_layer
}

fn join_cells(cells: &[char]) -> String {
    cells
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("  ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

pub(crate) fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
