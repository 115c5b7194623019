use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KeymetryError, KmResult};

pub type FrequencyTable = BTreeMap<String, u64>;
pub type BigramTable = BTreeMap<String, u64>;

/// Aggregated counters produced by the capture collaborator. Every
/// field is optional on disk; absent fields default to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencySnapshot {
    pub keys: FrequencyTable,
    pub bigrams: BigramTable,
    pub trigrams: BTreeMap<String, u64>,
    pub combos: BTreeMap<String, u64>,
    pub total_keystrokes: u64,
    pub total_sessions: u64,
    pub finger_stats: FingerStatsCache,
    pub transitions: BTreeMap<String, TransitionCache>,
}

/// Pre-computed finger aggregates some recorders persist alongside the
/// raw counters. Advisory only; the engine recomputes from `keys` and
/// `bigrams` when asked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerStatsCache {
    pub finger_load: BTreeMap<String, f64>,
    pub sfb_rate: f64,
    pub hand_alternation_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionCache {
    pub count: u64,
    pub avg_timing: f64,
    pub comfort_score: f64,
}

impl FrequencySnapshot {
    /// The one failure that must reach the user: no snapshot, no
    /// analysis.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KmResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(KeymetryError::InputNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let snapshot: FrequencySnapshot = serde_json::from_str(&content)?;
        debug!(
            "Snapshot loaded: {} keys, {} bigrams, {} keystrokes total",
            snapshot.keys.len(),
            snapshot.bigrams.len(),
            snapshot.total_keystrokes
        );
        Ok(snapshot)
    }

    pub fn top_keys(&self, n: usize) -> Vec<(String, u64)> {
        top_entries(&self.keys, n)
    }

    pub fn top_bigrams(&self, n: usize) -> Vec<(String, u64)> {
        top_entries(&self.bigrams, n)
    }

    pub fn summary(&self, top_n: usize) -> SummaryStats {
        SummaryStats {
            total_keystrokes: self.total_keystrokes,
            total_sessions: self.total_sessions,
            unique_keys: self.keys.len(),
            unique_bigrams: self.bigrams.len(),
            unique_combos: self.combos.len(),
            top_keys: self.top_keys(top_n),
            top_bigrams: self.top_bigrams(top_n),
        }
    }
}

fn top_entries(table: &BTreeMap<String, u64>, n: usize) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> =
        table.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);
    entries
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    pub total_keystrokes: u64,
    pub total_sessions: u64,
    pub unique_keys: usize,
    pub unique_bigrams: usize,
    pub unique_combos: usize,
    pub top_keys: Vec<(String, u64)>,
    pub top_bigrams: Vec<(String, u64)>,
}

/// One recorded keystroke with its wall-clock timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    pub symbol: String,
    pub timestamp_ms: f64,
}

/// Reads a `symbol,timestamp_ms` event log. Malformed rows are
/// dropped, matching how the counters treat unknown symbols.
pub fn read_events<R: Read>(reader: R) -> KmResult<Vec<KeyEvent>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let mut events = Vec::new();
    for record in rdr.records().flatten() {
        if record.len() < 2 {
            continue;
        }
        let symbol = record[0].trim().to_string();
        if symbol.is_empty() {
            continue;
        }
        if let Ok(timestamp_ms) = record[1].trim().parse::<f64>() {
            events.push(KeyEvent {
                symbol,
                timestamp_ms,
            });
        }
    }
    Ok(events)
}

pub fn load_events_csv<P: AsRef<Path>>(path: P) -> KmResult<Vec<KeyEvent>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(KeymetryError::InputNotFound(path.display().to_string()));
    }
    let file = fs::File::open(path)?;
    read_events(file)
}
