use std::collections::HashMap;

use serde::Serialize;

use crate::config::PatternParams;

/// Two-symbol idioms worth macro keys on a programmable board.
pub const SYMBOL_PAIRS: &[&str] = &[
    "()", "[]", "{}", "<>", "\"\"", "''", "``", "->", "=>", "==", "!=", "<=", ">=", "&&", "||",
    "::", "//", "/*", "*/", "<!--", "-->",
];

/// Longer literals the macro suggester always checks.
const MACRO_LITERALS: &[&str] = &[
    "def ", "class ", "import ", "from ", "__init__", "__main__", "__name__", "\"\"\"", "'''",
    ".com", ".org", "https://", "www.",
];

#[derive(Debug, Clone, Serialize)]
pub struct MacroSuggestion {
    pub pattern: String,
    pub frequency: usize,
    pub keystrokes_current: usize,
    pub keystrokes_saved: usize,
    pub percentage: f64,
    pub recommended: bool,
}

/// Mines a symbol stream for repeated substrings and macro-worthy
/// literals. Quadratic in the input length, so callers pass bounded
/// samples, not full history.
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    params: PatternParams,
}

impl PatternDetector {
    pub fn new(params: PatternParams) -> Self {
        Self { params }
    }

    /// Counts every contiguous run of `min_sequence_len` up to
    /// `max_sequence_len` symbols (overlapping occurrences included),
    /// drops runs made of one repeated character, keeps those seen at
    /// least `min_count` times. Sorted by count descending; ties keep
    /// first-encountered order.
    pub fn find_repeated_sequences(&self, symbols: &[String]) -> Vec<(String, usize)> {
        self.repeated_sequences(symbols, self.params.min_sequence_count)
    }

    fn repeated_sequences(&self, symbols: &[String], min_count: usize) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        let upper = self.params.max_sequence_len.min(symbols.len());
        for length in self.params.min_sequence_len..upper {
            for window in symbols.windows(length) {
                let sequence = window.concat();
                if !has_distinct_chars(&sequence) {
                    continue;
                }
                match index.get(&sequence) {
                    Some(&i) => counts[i].1 += 1,
                    None => {
                        index.insert(sequence.clone(), counts.len());
                        counts.push((sequence, 1));
                    }
                }
            }
        }

        let mut frequent: Vec<(String, usize)> = counts
            .into_iter()
            .filter(|(_, count)| *count >= min_count)
            .collect();
        frequent.sort_by(|a, b| b.1.cmp(&a.1));
        frequent
    }

    /// Occurrence counts for a fixed literal catalogue plus discovered
    /// sequences, each scored by the keystrokes a single macro key
    /// would save. Sorted by savings descending.
    pub fn suggest_macros(
        &self,
        symbols: &[String],
        candidates: Option<&[&str]>,
    ) -> Vec<MacroSuggestion> {
        let catalogue: Vec<&str> = match candidates {
            Some(c) => c.to_vec(),
            None => SYMBOL_PAIRS
                .iter()
                .chain(MACRO_LITERALS.iter())
                .copied()
                .collect(),
        };

        let text: String = symbols.concat();
        let mut suggestions = Vec::new();

        for pattern in catalogue {
            let count = text.matches(pattern).count();
            if count >= self.params.macro_threshold {
                suggestions.push(self.suggestion(pattern, count, symbols.len()));
            }
        }

        let repeated = self.repeated_sequences(symbols, self.params.macro_threshold);
        for (sequence, count) in repeated.into_iter().take(10) {
            if sequence.chars().count() >= 3 && count >= self.params.macro_threshold {
                suggestions.push(self.suggestion(&sequence, count, symbols.len()));
            }
        }

        suggestions.sort_by(|a, b| b.keystrokes_saved.cmp(&a.keystrokes_saved));
        suggestions
    }

    fn suggestion(&self, pattern: &str, count: usize, stream_len: usize) -> MacroSuggestion {
        let keystrokes_current = pattern.chars().count();
        // One macro key replaces the whole literal.
        let keystrokes_saved = keystrokes_current.saturating_sub(1) * count;
        let percentage = if stream_len == 0 {
            0.0
        } else {
            count as f64 / stream_len as f64 * 100.0
        };
        MacroSuggestion {
            pattern: pattern.to_string(),
            frequency: count,
            keystrokes_current,
            keystrokes_saved,
            percentage,
            recommended: keystrokes_saved > self.params.savings_floor,
        }
    }
}

fn has_distinct_chars(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => chars.any(|c| c != first),
        None => false,
    }
}
