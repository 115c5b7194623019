//! High-level analysis facade.
//!
//! [`Analyzer`] owns one loaded snapshot plus the static device model and
//! exposes each analysis flow as a single call. The CLI goes through this
//! seam exclusively; embedding callers can too.

use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::device::SlotCatalogue;
use crate::ergonomics::{FingerMap, FingerUsageReport};
use crate::error::KmResult;
use crate::export::{thousands, LayoutExporter, OryxDocument};
use crate::optimizer::{KeyAssignment, SymbolOptimizer};
use crate::patterns::{MacroSuggestion, PatternDetector};
use crate::simulator::{
    compare_layouts, thumb_candidates, EfficiencyReport, LayerLookup, LayerSimulator,
    LayoutComparison, ThumbCandidate,
};
use crate::snapshot::{FrequencySnapshot, KeyEvent, SummaryStats};
use crate::timing::{TimingAnalyzer, TransitionLog};

pub struct Analyzer {
    snapshot: FrequencySnapshot,
    config: Config,
    fingers: FingerMap,
    catalogue: SlotCatalogue,
}

impl Analyzer {
    pub fn new(snapshot: FrequencySnapshot, config: Config) -> Self {
        Self {
            snapshot,
            config,
            fingers: FingerMap::standard(),
            catalogue: SlotCatalogue::voyager(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P, config: Config) -> KmResult<Self> {
        let snapshot = FrequencySnapshot::load_from_file(path)?;
        info!(
            "📊 snapshot loaded: {} keystrokes over {} sessions",
            snapshot.total_keystrokes, snapshot.total_sessions
        );
        Ok(Self::new(snapshot, config))
    }

    pub fn snapshot(&self) -> &FrequencySnapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn finger_map(&self) -> &FingerMap {
        &self.fingers
    }

    pub fn summary(&self, top_n: usize) -> SummaryStats {
        self.snapshot.summary(top_n)
    }

    pub fn finger_usage(&self) -> FingerUsageReport {
        self.fingers
            .usage_report(&self.snapshot.keys, &self.snapshot.bigrams)
    }

    /// Transition log for comfort scoring: the snapshot's persisted cache
    /// when present, otherwise synthesized from bigram counts at the
    /// normal-latency default.
    pub fn transition_log(&self) -> TransitionLog {
        if self.snapshot.transitions.is_empty() {
            TransitionLog::from_bigrams(&self.snapshot.bigrams, self.config.timing.normal_ms)
        } else {
            TransitionLog::from_cache(&self.snapshot.transitions)
        }
    }

    /// Latency analysis over a raw event stream.
    pub fn timing(&self, events: &[KeyEvent]) -> TimingAnalyzer {
        let mut analyzer = TimingAnalyzer::new(self.config.timing.clone());
        analyzer.ingest(events);
        analyzer
    }

    /// Repeated sequences and macro suggestions for a symbol stream.
    pub fn patterns(&self, symbols: &[String]) -> (Vec<(String, usize)>, Vec<MacroSuggestion>) {
        let detector = PatternDetector::new(self.config.patterns.clone());
        let sequences = detector.find_repeated_sequences(symbols);
        let macros = detector.suggest_macros(symbols, None);
        (sequences, macros)
    }

    pub fn optimize(&self, layer: u8) -> Vec<KeyAssignment> {
        SymbolOptimizer::new(&self.snapshot, &self.catalogue, self.config.optimizer.clone())
            .optimize(layer)
    }

    /// Efficiency of the stock layout, or of the stock layout with an
    /// optimizer plan applied when `assignments` is non-empty.
    pub fn efficiency(&self, assignments: &[KeyAssignment]) -> KmResult<EfficiencyReport> {
        let lookup = if assignments.is_empty() {
            LayerLookup::voyager_default()
        } else {
            LayerLookup::with_assignments(assignments)
        };
        LayerSimulator::new(&lookup, &self.config.simulator).analyze_efficiency(&self.snapshot)
    }

    /// Stock layout versus the same layout with a plan applied.
    pub fn compare(&self, assignments: &[KeyAssignment]) -> LayoutComparison {
        let current = LayerLookup::voyager_default();
        let candidate = LayerLookup::with_assignments(assignments);
        compare_layouts(&current, &candidate, &self.snapshot, &self.config.simulator)
    }

    pub fn thumb_candidates(&self, top_n: usize) -> Vec<ThumbCandidate> {
        thumb_candidates(&self.snapshot, top_n)
    }

    /// Builds the configurator document and writes it to `path`.
    pub fn export_oryx(
        &self,
        name: &str,
        assignments: &[KeyAssignment],
        path: &Path,
    ) -> KmResult<OryxDocument> {
        let exporter = LayoutExporter::new(name);
        let mut rng = fastrand::Rng::new();
        let document = exporter.export(assignments, &mut rng);
        exporter.write_json(&document, path)?;
        Ok(document)
    }

    /// Rationale and cheatsheet renderers, parameterized by layout name.
    pub fn exporter(&self, name: &str) -> LayoutExporter {
        LayoutExporter::new(name)
    }

    /// Full markdown analysis report: summary, finger analysis, stock
    /// layout simulation, and thumb candidates.
    pub fn generate_report(&self) -> String {
        let mut report = String::from("# Keystroke Analysis Report\n\n");

        report.push_str("## Summary\n\n");
        let summary = self.summary(10);
        report.push_str(&format!(
            "- **Total Keystrokes**: {}\n",
            thousands(summary.total_keystrokes)
        ));
        report.push_str(&format!("- **Sessions**: {}\n", summary.total_sessions));
        report.push_str(&format!("- **Unique Keys**: {}\n", summary.unique_keys));
        report.push_str(&format!(
            "- **Unique Bigrams**: {}\n\n",
            summary.unique_bigrams
        ));

        report.push_str("### Top 10 Keys\n\n");
        for (key, count) in &summary.top_keys {
            report.push_str(&format!("- `{key}`: {}\n", thousands(*count)));
        }
        report.push('\n');

        report.push_str("## Finger Analysis\n\n");
        let usage = self.finger_usage();
        report.push_str(&format!("- **SFB Rate**: {:.2}%\n", usage.sfb_rate));
        report.push_str(&format!(
            "- **Hand Alternation**: {:.2}%\n",
            usage.hand_alternation_rate
        ));
        report.push_str(&format!(
            "- **Ergonomic Score**: {:.1}/100\n\n",
            usage.assessment.overall_score
        ));

        if !usage.assessment.issues.is_empty() {
            report.push_str("### Issues\n\n");
            for issue in &usage.assessment.issues {
                report.push_str(&format!("- {issue}\n"));
            }
            report.push('\n');
        }
        if !usage.assessment.recommendations.is_empty() {
            report.push_str("### Recommendations\n\n");
            for rec in &usage.assessment.recommendations {
                report.push_str(&format!("- {rec}\n"));
            }
            report.push('\n');
        }

        report.push_str("## Voyager Simulation\n\n");
        if let Ok(efficiency) = self.efficiency(&[]) {
            report.push_str(&format!(
                "- **Layer Switches per 100 chars**: {:.2}\n",
                efficiency.simulation.switches_per_100
            ));
            report.push_str(&format!(
                "- **Efficiency Score**: {:.1}/100\n",
                efficiency.efficiency_score
            ));
            report.push_str(&format!(
                "- **Meets Target**: {}\n\n",
                if efficiency.meets_target { "✓" } else { "✗" }
            ));

            if !efficiency.recommendations.is_empty() {
                report.push_str("### Recommendations\n\n");
                for rec in &efficiency.recommendations {
                    report.push_str(&format!("- {rec}\n"));
                }
                report.push('\n');
            }
        }

        report.push_str("## Thumb Key Candidates\n\n");
        for (i, candidate) in self.thumb_candidates(5).iter().enumerate() {
            report.push_str(&format!(
                "{}. **{}**: {} uses - {}\n",
                i + 1,
                candidate.key,
                candidate.frequency,
                candidate.reason
            ));
        }
        report.push('\n');

        report
    }
}
