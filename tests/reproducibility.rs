mod common;

use std::io::Write;

use keymetry::api::Analyzer;
use keymetry::config::Config;
use keymetry::device::SlotCatalogue;
use keymetry::export::LayoutExporter;
use keymetry::optimizer::SymbolOptimizer;
use tempfile::NamedTempFile;

// The whole pipeline is expected to be a pure function of its inputs:
// same snapshot in, same tables, plans and documents out, on every run.

#[test]
fn test_wire_documents_serialize_identically() {
    let snapshot = common::python_snapshot();
    let catalogue = SlotCatalogue::voyager();
    let plan = SymbolOptimizer::new(&snapshot, &catalogue, Default::default()).optimize(1);
    let exporter = LayoutExporter::new("Stable");

    let first = exporter.build_document(&plan, "fixed".to_string(), "2026-08-25".to_string());
    let second = exporter.build_document(&plan, "fixed".to_string(), "2026-08-25".to_string());
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_rationale_renders_identically() {
    let snapshot = common::python_snapshot();
    let catalogue = SlotCatalogue::voyager();
    let plan = SymbolOptimizer::new(&snapshot, &catalogue, Default::default()).optimize(1);
    let exporter = LayoutExporter::new("Stable");

    assert_eq!(
        exporter.render_rationale(&snapshot, &plan, "python"),
        exporter.render_rationale(&snapshot, &plan, "python")
    );
}

#[test]
fn test_analyzers_from_the_same_file_agree() {
    let mut file = NamedTempFile::new().unwrap();
    let json = serde_json::to_string(&common::python_snapshot()).unwrap();
    write!(file, "{json}").unwrap();

    let first = Analyzer::from_file(file.path(), Config::default()).unwrap();
    let second = Analyzer::from_file(file.path(), Config::default()).unwrap();

    assert_eq!(
        serde_json::to_string(&first.summary(5)).unwrap(),
        serde_json::to_string(&second.summary(5)).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first.finger_usage()).unwrap(),
        serde_json::to_string(&second.finger_usage()).unwrap()
    );
    assert_eq!(first.optimize(1), second.optimize(1));
    assert_eq!(first.generate_report(), second.generate_report());
}

#[test]
fn test_transition_queries_break_ties_the_same_way() {
    let events = common::sample_events(
        &["d", "e", "f", " ", "g", "h", "d", "e", "f", " "],
        1000.0,
        137.0,
    );
    let analyzer = Analyzer::new(common::python_snapshot(), Config::default());

    let first = analyzer.timing(&events);
    let second = analyzer.timing(&events);
    let model = analyzer.finger_map();
    let weights = &analyzer.config().comfort;

    assert_eq!(
        serde_json::to_string(&first.transitions().top(10, model, weights)).unwrap(),
        serde_json::to_string(&second.transitions().top(10, model, weights)).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first.transitions().awkward(model, weights, 1)).unwrap(),
        serde_json::to_string(&second.transitions().awkward(model, weights, 1)).unwrap()
    );
}
