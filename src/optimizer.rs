use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::debug;

use crate::config::OptimizerParams;
use crate::device::{PositionSlot, SlotCatalogue, SlotTier};
use crate::ergonomics::Hand;
use crate::snapshot::FrequencySnapshot;

/// Counts for printable non-alphanumeric symbols. Letters, digits,
/// whitespace, and named special keys stay out of symbol optimization.
pub fn symbol_frequencies(snapshot: &FrequencySnapshot) -> BTreeMap<String, u64> {
    snapshot
        .keys
        .iter()
        .filter(|(key, _)| {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => !c.is_alphanumeric() && !matches!(c, ' ' | '\n' | '\t'),
                _ => false,
            }
        })
        .map(|(key, count)| (key.clone(), *count))
        .collect()
}

/// Opening/closing symbols that should land on related slots.
pub const SYMBOL_PAIRS: &[(&str, &str)] = &[
    ("(", ")"),
    ("[", "]"),
    ("{", "}"),
    ("<", ">"),
    ("\"", "\""),
    ("'", "'"),
];

/// One symbol bound to one slot in one layer, with the frequency that
/// earned it and a human-readable justification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyAssignment {
    pub symbol: String,
    pub slot: PositionSlot,
    pub tier: SlotTier,
    pub layer: u8,
    pub frequency: u64,
    pub reason: String,
}

/// Deterministic two-pass greedy placement: bracket/quote pairs onto
/// mirrored top-tier slots first, then high-frequency singles onto the
/// best remaining slots. Explainable by construction; every assignment
/// carries its reason.
#[derive(Debug)]
pub struct SymbolOptimizer<'a> {
    snapshot: &'a FrequencySnapshot,
    catalogue: &'a SlotCatalogue,
    params: OptimizerParams,
}

impl<'a> SymbolOptimizer<'a> {
    pub fn new(
        snapshot: &'a FrequencySnapshot,
        catalogue: &'a SlotCatalogue,
        params: OptimizerParams,
    ) -> Self {
        Self {
            snapshot,
            catalogue,
            params,
        }
    }

    /// Pair score = freq(a) + freq(b) + 2 x count of both bigram
    /// orderings. Pairs with zero individual frequency are dropped.
    fn pair_scores(&self, symbol_freq: &BTreeMap<String, u64>) -> Vec<(&'static str, &'static str, u64)> {
        let mut scores: Vec<(&'static str, &'static str, u64)> = Vec::new();

        for (first, second) in SYMBOL_PAIRS {
            let together = self
                .snapshot
                .bigrams
                .get(&format!("{first}{second}"))
                .copied()
                .unwrap_or(0)
                + self
                    .snapshot
                    .bigrams
                    .get(&format!("{second}{first}"))
                    .copied()
                    .unwrap_or(0);
            let combined = symbol_freq.get(*first).copied().unwrap_or(0)
                + symbol_freq.get(*second).copied().unwrap_or(0);

            if combined > 0 {
                scores.push((first, second, combined + together * 2));
            }
        }

        scores.sort_by(|a, b| b.2.cmp(&a.2));
        scores
    }

    /// Two free top-tier slots for a pair: a mirrored placement (same
    /// row, left then right hand) if any exists, else an adjacent one
    /// (same row, neighboring columns), else the first two free slots.
    fn find_paired_slots(
        &self,
        used: &BTreeSet<(u8, u8)>,
    ) -> Option<((SlotTier, PositionSlot), (SlotTier, PositionSlot))> {
        let top_tier: Vec<(SlotTier, PositionSlot)> = [SlotTier::Prime, SlotTier::Good]
            .into_iter()
            .flat_map(|tier| self.catalogue.tier(tier).iter().map(move |s| (tier, *s)))
            .filter(|(_, slot)| !used.contains(&(slot.row, slot.col)))
            .collect();

        for (t1, s1) in &top_tier {
            for (t2, s2) in &top_tier {
                if s1.row == s2.row && s1.hand() == Hand::Left && s2.hand() == Hand::Right {
                    return Some(((*t1, *s1), (*t2, *s2)));
                }
            }
        }

        for (t1, s1) in &top_tier {
            for (t2, s2) in &top_tier {
                if s1.row == s2.row && (s1.col as i16 - s2.col as i16).abs() == 1 {
                    return Some(((*t1, *s1), (*t2, *s2)));
                }
            }
        }

        if top_tier.len() >= 2 {
            return Some((top_tier[0], top_tier[1]));
        }
        None
    }

    /// All slots in assignment preference order: tier quality first,
    /// then slot score within the tier.
    fn ranked_slots(&self) -> Vec<(SlotTier, PositionSlot)> {
        let mut ranked = Vec::new();
        for tier in SlotTier::iter() {
            let mut slots: Vec<PositionSlot> = self.catalogue.tier(tier).to_vec();
            slots.sort_by(|a, b| b.score.cmp(&a.score));
            ranked.extend(slots.into_iter().map(|s| (tier, s)));
        }
        ranked
    }

    pub fn optimize(&self, layer: u8) -> Vec<KeyAssignment> {
        let symbol_freq = symbol_frequencies(self.snapshot);
        let pair_scores = self.pair_scores(&symbol_freq);

        let mut assignments: Vec<KeyAssignment> = Vec::new();
        let mut used: BTreeSet<(u8, u8)> = BTreeSet::new();
        let mut assigned: BTreeSet<String> = BTreeSet::new();

        // Pass 1: pairs above the threshold get two slots together. A
        // pair that cannot be placed is skipped for good; it does not
        // re-enter the individual pass.
        for (first, second, score) in &pair_scores {
            if *score <= self.params.pair_threshold {
                continue;
            }
            if first == second || assigned.contains(*first) || assigned.contains(*second) {
                continue;
            }
            let Some(((tier1, slot1), (tier2, slot2))) = self.find_paired_slots(&used) else {
                continue;
            };

            used.insert((slot1.row, slot1.col));
            used.insert((slot2.row, slot2.col));
            assigned.insert(first.to_string());
            assigned.insert(second.to_string());

            assignments.push(KeyAssignment {
                symbol: first.to_string(),
                slot: slot1,
                tier: tier1,
                layer,
                frequency: symbol_freq.get(*first).copied().unwrap_or(0),
                reason: format!("Paired with {second}"),
            });
            assignments.push(KeyAssignment {
                symbol: second.to_string(),
                slot: slot2,
                tier: tier2,
                layer,
                frequency: symbol_freq.get(*second).copied().unwrap_or(0),
                reason: format!("Paired with {first}"),
            });
        }

        // Pass 2: remaining symbols by frequency onto the best free
        // slots. Anything past the limit stays unassigned and falls
        // back to the device's transparent behavior.
        let mut remaining: Vec<(String, u64)> = symbol_freq
            .iter()
            .filter(|(sym, _)| !assigned.contains(*sym))
            .map(|(sym, freq)| (sym.clone(), *freq))
            .collect();
        remaining.sort_by(|a, b| b.1.cmp(&a.1));

        let ranked = self.ranked_slots();
        for (symbol, freq) in remaining.into_iter().take(self.params.individual_limit) {
            let Some((tier, slot)) = ranked
                .iter()
                .find(|(_, s)| !used.contains(&(s.row, s.col)))
                .copied()
            else {
                break;
            };
            used.insert((slot.row, slot.col));
            assignments.push(KeyAssignment {
                symbol,
                slot,
                tier,
                layer,
                frequency: freq,
                reason: format!("High frequency: {freq} uses"),
            });
        }

        assignments.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        debug!(
            "Optimized layer {}: {} assignments from {} candidate symbols",
            layer,
            assignments.len(),
            symbol_freq.len()
        );
        assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_pairs_cover_brackets_and_quotes() {
        assert_eq!(SYMBOL_PAIRS.len(), 6);
        assert!(SYMBOL_PAIRS.contains(&("(", ")")));
        assert!(SYMBOL_PAIRS.contains(&("'", "'")));
    }
}
