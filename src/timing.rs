use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

use crate::config::{ComfortWeights, TimingThresholds};
use crate::ergonomics::FingerMap;
use crate::snapshot::{BigramTable, KeyEvent, TransitionCache};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LatencyClass {
    Normal,
    Hesitation,
    Pause,
}

impl LatencyClass {
    pub fn classify(delta_ms: f64, thresholds: &TimingThresholds) -> Self {
        if delta_ms >= thresholds.pause_ms {
            LatencyClass::Pause
        } else if delta_ms > thresholds.hesitation_ms {
            LatencyClass::Hesitation
        } else {
            LatencyClass::Normal
        }
    }
}

/// Aggregate latency data for one ordered symbol pair. Comfort is
/// always derived from the current aggregate, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionRecord {
    pub count: u64,
    pub total_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl TransitionRecord {
    fn new(delta_ms: f64) -> Self {
        Self {
            count: 1,
            total_ms: delta_ms,
            min_ms: delta_ms,
            max_ms: delta_ms,
        }
    }

    fn observe(&mut self, delta_ms: f64) {
        self.count += 1;
        self.total_ms += delta_ms;
        self.min_ms = self.min_ms.min(delta_ms);
        self.max_ms = self.max_ms.max(delta_ms);
    }

    pub fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms / self.count as f64
        }
    }
}

/// Ordered-pair transition aggregates, kept in first-seen order so
/// equal-count queries break ties the same way on every run.
#[derive(Debug, Clone, Default)]
pub struct TransitionLog {
    entries: Vec<((String, String), TransitionRecord)>,
    index: HashMap<(String, String), usize>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synthesizes a log from cached bigram counts when no live timing
    /// stream exists. Every pair gets the flat default latency.
    pub fn from_bigrams(bigrams: &BigramTable, default_ms: f64) -> Self {
        let mut log = Self::new();
        for (bigram, count) in bigrams {
            let chars: Vec<char> = bigram.chars().collect();
            if chars.len() < 2 {
                continue;
            }
            log.insert_aggregate(
                chars[0].to_string(),
                chars[1].to_string(),
                TransitionRecord {
                    count: *count,
                    total_ms: default_ms * *count as f64,
                    min_ms: default_ms,
                    max_ms: default_ms,
                },
            );
        }
        log
    }

    /// Rehydrates a log from a recorder's persisted transition cache.
    pub fn from_cache(cache: &BTreeMap<String, TransitionCache>) -> Self {
        let mut log = Self::new();
        for (key, cached) in cache {
            let Some((from, to)) = key.split_once('→') else {
                continue;
            };
            log.insert_aggregate(
                from.to_string(),
                to.to_string(),
                TransitionRecord {
                    count: cached.count,
                    total_ms: cached.avg_timing * cached.count as f64,
                    min_ms: cached.avg_timing,
                    max_ms: cached.avg_timing,
                },
            );
        }
        log
    }

    fn insert_aggregate(&mut self, from: String, to: String, record: TransitionRecord) {
        let key = (from, to);
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = record,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, record));
            }
        }
    }

    pub fn record(&mut self, from: &str, to: &str, delta_ms: f64) {
        let key = (from.to_string(), to.to_string());
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1.observe(delta_ms),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, TransitionRecord::new(delta_ms)));
            }
        }
    }

    pub fn get(&self, from: &str, to: &str) -> Option<&TransitionRecord> {
        self.index
            .get(&(from.to_string(), to.to_string()))
            .map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &TransitionRecord)> {
        self.entries
            .iter()
            .map(|((from, to), rec)| (from.as_str(), to.as_str(), rec))
    }

    /// 0-100 desirability of typing `to` right after `from`. Timing
    /// adjustments apply only when this pair has recorded history.
    pub fn comfort_score(
        &self,
        model: &FingerMap,
        weights: &ComfortWeights,
        from: &str,
        to: &str,
    ) -> f64 {
        let mut score = weights.comfort_base;

        if model.is_same_finger_bigram(from, to) {
            score -= weights.penalty_same_finger;
        }
        if model.is_hand_alternation(from, to) {
            score += weights.bonus_alternation;
        }
        score -= model.row_jump(from, to) as f64 * weights.penalty_row_jump;

        if let Some(record) = self.get(from, to) {
            let avg = record.avg_ms();
            if avg < weights.fast_ms {
                score += weights.bonus_fast;
            } else if avg > weights.slow_ms {
                score -= weights.penalty_slow;
            }
        }

        score.clamp(0.0, 100.0)
    }

    /// The `n` highest-count pairs; equal counts keep first-seen order.
    pub fn top(
        &self,
        n: usize,
        model: &FingerMap,
        weights: &ComfortWeights,
    ) -> Vec<TransitionSummary> {
        let mut summaries: Vec<TransitionSummary> = self
            .entries
            .iter()
            .map(|((from, to), rec)| TransitionSummary {
                from: from.clone(),
                to: to.clone(),
                count: rec.count,
                avg_ms: rec.avg_ms(),
                comfort: self.comfort_score(model, weights, from, to),
            })
            .collect();
        summaries.sort_by(|a, b| b.count.cmp(&a.count));
        summaries.truncate(n);
        summaries
    }

    /// Pairs seen at least `min_count` times whose comfort falls below
    /// the awkward ceiling, worst first.
    pub fn awkward(
        &self,
        model: &FingerMap,
        weights: &ComfortWeights,
        min_count: u64,
    ) -> Vec<AwkwardTransition> {
        let mut awkward: Vec<AwkwardTransition> = self
            .entries
            .iter()
            .filter(|(_, rec)| rec.count >= min_count)
            .filter_map(|((from, to), rec)| {
                let comfort = self.comfort_score(model, weights, from, to);
                if comfort < weights.awkward_ceiling {
                    Some(AwkwardTransition {
                        from: from.clone(),
                        to: to.clone(),
                        count: rec.count,
                        comfort,
                        reason: explain_awkwardness(model, from, to),
                    })
                } else {
                    None
                }
            })
            .collect();
        awkward.sort_by(|a, b| a.comfort.total_cmp(&b.comfort).then(b.count.cmp(&a.count)));
        awkward
    }

    /// Pairs that are consistently slow, slowest first.
    pub fn slow(&self, threshold_ms: f64, min_count: u64) -> Vec<SlowTransition> {
        let mut slow: Vec<SlowTransition> = self
            .entries
            .iter()
            .filter(|(_, rec)| rec.count >= min_count && rec.avg_ms() >= threshold_ms)
            .map(|((from, to), rec)| SlowTransition {
                from: from.clone(),
                to: to.clone(),
                count: rec.count,
                avg_ms: rec.avg_ms(),
            })
            .collect();
        slow.sort_by(|a, b| b.avg_ms.total_cmp(&a.avg_ms));
        slow
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SlowTransition {
    pub from: String,
    pub to: String,
    pub count: u64,
    pub avg_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitionSummary {
    pub from: String,
    pub to: String,
    pub count: u64,
    pub avg_ms: f64,
    pub comfort: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AwkwardTransition {
    pub from: String,
    pub to: String,
    pub count: u64,
    pub comfort: f64,
    pub reason: String,
}

fn explain_awkwardness(model: &FingerMap, from: &str, to: &str) -> String {
    if model.is_same_finger_bigram(from, to) {
        return "Same finger bigram".to_string();
    }
    let row_jump = model.row_jump(from, to);
    if row_jump >= 2 {
        return format!("Large row jump ({} rows)", row_jump);
    }
    "Uncomfortable reach".to_string()
}

/// One detected hesitation with the surrounding symbols. The trailing
/// context starts at the hesitant symbol itself.
#[derive(Debug, Clone, Serialize)]
pub struct Hesitation {
    pub prev_symbol: String,
    pub next_symbol: String,
    pub delay_ms: f64,
    pub timestamp_ms: f64,
    pub context_before: Vec<String>,
    pub context_after: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LatencyStats {
    pub avg_ms: f64,
    pub median_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub p95_ms: f64,
}

/// Walks a (symbol, timestamp) stream, classifying every delta and
/// accumulating transition aggregates. Pauses stay out of the latency
/// statistics but still update their pair's record.
#[derive(Debug, Clone, Default)]
pub struct TimingAnalyzer {
    thresholds: TimingThresholds,
    inter_key: Vec<f64>,
    hesitations: Vec<Hesitation>,
    class_counts: BTreeMap<LatencyClass, u64>,
    log: TransitionLog,
}

impl TimingAnalyzer {
    pub fn new(thresholds: TimingThresholds) -> Self {
        Self {
            thresholds,
            ..Self::default()
        }
    }

    pub fn ingest(&mut self, events: &[KeyEvent]) {
        let window = self.thresholds.context_window;

        for i in 1..events.len() {
            let delta = events[i].timestamp_ms - events[i - 1].timestamp_ms;
            let class = LatencyClass::classify(delta, &self.thresholds);
            *self.class_counts.entry(class).or_insert(0) += 1;

            if delta < self.thresholds.pause_ms {
                self.inter_key.push(delta);
            }

            if class == LatencyClass::Hesitation {
                let before = &events[i.saturating_sub(window)..i];
                let after = &events[i..events.len().min(i + window)];
                self.hesitations.push(Hesitation {
                    prev_symbol: events[i - 1].symbol.clone(),
                    next_symbol: events[i].symbol.clone(),
                    delay_ms: delta,
                    timestamp_ms: events[i].timestamp_ms,
                    context_before: before.iter().map(|e| e.symbol.clone()).collect(),
                    context_after: after.iter().map(|e| e.symbol.clone()).collect(),
                });
            }

            self.log
                .record(&events[i - 1].symbol, &events[i].symbol, delta);
        }
    }

    pub fn stats(&self) -> LatencyStats {
        if self.inter_key.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted = self.inter_key.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let n = sorted.len();

        LatencyStats {
            avg_ms: sorted.iter().sum::<f64>() / n as f64,
            median_ms: sorted[n / 2],
            min_ms: sorted[0],
            max_ms: sorted[n - 1],
            p95_ms: if n > 20 {
                sorted[(n as f64 * 0.95) as usize]
            } else {
                sorted[n - 1]
            },
        }
    }

    pub fn hesitations(&self) -> &[Hesitation] {
        &self.hesitations
    }

    pub fn class_counts(&self) -> &BTreeMap<LatencyClass, u64> {
        &self.class_counts
    }

    pub fn transitions(&self) -> &TransitionLog {
        &self.log
    }
}
