use std::collections::BTreeSet;

use keymetry::config::{ComfortWeights, OptimizerParams, SimulatorParams};
use keymetry::device::SlotCatalogue;
use keymetry::ergonomics::FingerMap;
use keymetry::keycodes::KeycodeTable;
use keymetry::optimizer::SymbolOptimizer;
use keymetry::simulator::{LayerLookup, LayerSimulator};
use keymetry::snapshot::FrequencySnapshot;
use keymetry::timing::TransitionLog;
use proptest::prelude::*;

const SYMBOLS: &[&str] = &[
    "a", "e", "t", "h", "j", "k", "q", "z", "(", ")", "[", "]", "{", "}", "_", ":", ";", ".", ",",
    "=", "\"", "'", "[space]", "[enter]", "[backspace]",
];

prop_compose! {
    fn arb_symbol()(choice in prop::sample::select(SYMBOLS)) -> String {
        choice.to_string()
    }
}

prop_compose! {
    fn arb_snapshot()(
        keys in prop::collection::btree_map(arb_symbol(), 1..5000u64, 0..20),
        bigrams in prop::collection::btree_map("[a-z(){}_:]{2}", 1..500u64, 0..15),
    ) -> FrequencySnapshot {
        let total = keys.values().sum();
        FrequencySnapshot {
            keys,
            bigrams,
            total_keystrokes: total,
            ..FrequencySnapshot::default()
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn finger_shares_never_exceed_the_whole(snapshot in arb_snapshot()) {
        let model = FingerMap::standard();
        let load = model.finger_load(&snapshot.keys);
        let mut sum = 0.0;
        for (_, share) in &load {
            prop_assert!((0.0..=100.0).contains(share));
            sum += share;
        }
        prop_assert!(sum <= 100.0 + 1e-6);
    }

    #[test]
    fn bigram_rates_are_percentages(snapshot in arb_snapshot()) {
        let model = FingerMap::standard();
        prop_assert!((0.0..=100.0).contains(&model.sfb_rate(&snapshot.bigrams)));
        prop_assert!((0.0..=100.0).contains(&model.hand_alternation_rate(&snapshot.bigrams)));
    }

    #[test]
    fn ergonomic_scores_stay_bounded(snapshot in arb_snapshot()) {
        let model = FingerMap::standard();
        let report = model.usage_report(&snapshot.keys, &snapshot.bigrams);
        prop_assert!((0.0..=100.0).contains(&report.assessment.overall_score));
    }

    #[test]
    fn plans_never_double_book_slots(snapshot in arb_snapshot()) {
        let catalogue = SlotCatalogue::voyager();
        let optimizer = SymbolOptimizer::new(&snapshot, &catalogue, OptimizerParams::default());
        let plan = optimizer.optimize(1);

        let capacity = catalogue.iter().count();
        prop_assert!(plan.len() <= capacity);
        let slots: BTreeSet<(u8, u8)> = plan.iter().map(|a| (a.slot.row, a.slot.col)).collect();
        prop_assert_eq!(slots.len(), plan.len());
        for assignment in &plan {
            prop_assert_eq!(assignment.symbol.chars().count(), 1);
        }
    }

    #[test]
    fn plans_are_reproducible(snapshot in arb_snapshot()) {
        let catalogue = SlotCatalogue::voyager();
        let optimizer = SymbolOptimizer::new(&snapshot, &catalogue, OptimizerParams::default());
        prop_assert_eq!(optimizer.optimize(1), optimizer.optimize(1));
    }

    #[test]
    fn switch_rates_are_bounded(text in "[a-z#_: ]{0,80}") {
        let mut lookup = LayerLookup::voyager_default();
        lookup.place(1, 2, 3, "#");
        lookup.place(2, 2, 3, "_");
        lookup.place(3, 2, 3, ":");
        let params = SimulatorParams::default();

        let result = LayerSimulator::new(&lookup, &params).simulate(&text);
        prop_assert!(result.switches_per_100 <= 100.0);
        prop_assert!(result.overhead_per_char_ms <= params.layer_overhead_ms);
        for share in result.layer_distribution.values() {
            prop_assert!((0.0..=100.0).contains(share));
        }
    }

    // Splitting symbols across extra layers can only add switches: every
    // base-to-symbol boundary costs a switch either way, and symbol runs
    // that were free on a shared layer now pay per hop.
    #[test]
    fn spreading_symbols_over_layers_never_saves_switches(text in "[a-z#_: ]{0,80}") {
        let mut grouped = LayerLookup::voyager_default();
        grouped.place(1, 2, 3, "#");
        grouped.place(1, 2, 4, "_");
        grouped.place(1, 2, 5, ":");

        let mut split = LayerLookup::voyager_default();
        split.place(1, 2, 3, "#");
        split.place(2, 2, 4, "_");
        split.place(3, 2, 5, ":");

        let params = SimulatorParams::default();
        let on_one = LayerSimulator::new(&grouped, &params).simulate(&text);
        let on_three = LayerSimulator::new(&split, &params).simulate(&text);
        prop_assert!(on_one.layer_switches <= on_three.layer_switches);
    }

    #[test]
    fn efficiency_scores_stay_bounded(snapshot in arb_snapshot()) {
        let lookup = LayerLookup::voyager_default();
        let params = SimulatorParams::default();
        if let Ok(report) = LayerSimulator::new(&lookup, &params).analyze_efficiency(&snapshot) {
            prop_assert!((0.0..=100.0).contains(&report.efficiency_score));
        }
    }

    #[test]
    fn comfort_scores_clamp(
        from in arb_symbol(),
        to in arb_symbol(),
        delta in 0.0..5000.0f64,
    ) {
        let model = FingerMap::standard();
        let weights = ComfortWeights::default();
        let mut log = TransitionLog::new();
        log.record(&from, &to, delta);
        let comfort = log.comfort_score(&model, &weights, &from, &to);
        prop_assert!((0.0..=100.0).contains(&comfort));
    }

    #[test]
    fn wire_codes_are_printable_ascii(key in "[ -~]{1,6}") {
        let table = KeycodeTable::with_defaults();
        let code = table.wire_code(&key);
        prop_assert!(!code.is_empty());
        prop_assert!(code.is_ascii());
    }
}
