mod common;

use std::io::{Cursor, Write};

use keymetry::error::KeymetryError;
use keymetry::snapshot::{load_events_csv, read_events, FrequencySnapshot, KeyEvent};
use tempfile::NamedTempFile;

// --- SNAPSHOT LOADING ---

#[test]
fn test_partial_json_fills_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"keys": {{"e": 10}}, "total_keystrokes": 10}}"#).unwrap();

    let snapshot = FrequencySnapshot::load_from_file(file.path()).unwrap();
    assert_eq!(snapshot.keys["e"], 10);
    assert_eq!(snapshot.total_keystrokes, 10);
    assert!(snapshot.bigrams.is_empty());
    assert!(snapshot.transitions.is_empty());
    assert_eq!(snapshot.total_sessions, 0);
    assert_eq!(snapshot.finger_stats.sfb_rate, 0.0);
}

#[test]
fn test_missing_snapshot_reports_the_path() {
    let err = FrequencySnapshot::load_from_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, KeymetryError::InputNotFound(_)));
    let message = err.to_string();
    assert!(message.contains("Input Not Found"));
    assert!(message.contains("/definitely/not/here.json"));
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "this is not json").unwrap();

    let err = FrequencySnapshot::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, KeymetryError::Json(_)));
}

#[test]
fn test_snapshot_survives_a_disk_round_trip() {
    let original = common::python_snapshot();
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", serde_json::to_string(&original).unwrap()).unwrap();

    let loaded = FrequencySnapshot::load_from_file(file.path()).unwrap();
    assert_eq!(loaded.keys, original.keys);
    assert_eq!(loaded.bigrams, original.bigrams);
    assert_eq!(loaded.total_keystrokes, original.total_keystrokes);
    assert_eq!(loaded.total_sessions, original.total_sessions);
}

// --- EVENT LOG ---

#[test]
fn test_event_reader_drops_malformed_rows() {
    let csv = "\
symbol,timestamp_ms
e,100.5
  t  , 200
,300
x,notanumber
q
f,400,extra
";
    let events = read_events(Cursor::new(csv)).unwrap();
    assert_eq!(
        events,
        vec![
            KeyEvent {
                symbol: "e".to_string(),
                timestamp_ms: 100.5,
            },
            KeyEvent {
                symbol: "t".to_string(),
                timestamp_ms: 200.0,
            },
            KeyEvent {
                symbol: "f".to_string(),
                timestamp_ms: 400.0,
            },
        ]
    );
}

#[test]
fn test_empty_event_log_is_not_an_error() {
    let events = read_events(Cursor::new("symbol,timestamp_ms\n")).unwrap();
    assert!(events.is_empty());
}

#[test]
fn test_missing_events_csv_reports_the_path() {
    let err = load_events_csv("/no/such/events.csv").unwrap_err();
    assert!(matches!(err, KeymetryError::InputNotFound(_)));
}

#[test]
fn test_events_csv_reads_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "symbol,timestamp_ms").unwrap();
    writeln!(file, "d,1000").unwrap();
    writeln!(file, "e,1120.5").unwrap();

    let events = load_events_csv(file.path()).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].symbol, "e");
    assert_eq!(events[1].timestamp_ms, 1120.5);
}

// --- SUMMARY ---

#[test]
fn test_summary_tops_are_sorted_and_truncated() {
    let summary = common::python_snapshot().summary(3);

    assert_eq!(summary.total_keystrokes, 4340);
    assert_eq!(summary.total_sessions, 12);
    assert_eq!(summary.unique_keys, 11);
    assert_eq!(summary.unique_bigrams, 4);

    assert_eq!(summary.top_keys.len(), 3);
    assert_eq!(summary.top_keys[0], ("[space]".to_string(), 1200));
    assert_eq!(summary.top_keys[1], ("e".to_string(), 900));

    assert_eq!(summary.top_bigrams[0], ("th".to_string(), 220));
    assert_eq!(summary.top_bigrams[2], ("()".to_string(), 150));
}
