mod common;

use common::sample_events;
use keymetry::config::{ComfortWeights, TimingThresholds};
use keymetry::ergonomics::FingerMap;
use keymetry::snapshot::TransitionCache;
use keymetry::timing::{LatencyClass, TimingAnalyzer, TransitionLog};
use rstest::rstest;
use std::collections::BTreeMap;

fn analyzer_over(events: &[keymetry::snapshot::KeyEvent]) -> TimingAnalyzer {
    let mut analyzer = TimingAnalyzer::new(TimingThresholds::default());
    analyzer.ingest(events);
    analyzer
}

// --- LATENCY STATS ---

#[test]
fn test_ingest_builds_latency_stats() {
    let mut events = sample_events(&["a", "b", "c"], 0.0, 100.0);
    events.extend(sample_events(&["d"], 400.0, 0.0));

    let analyzer = analyzer_over(&events);
    let stats = analyzer.stats();

    // deltas: 100, 100, 200
    assert!((stats.avg_ms - 400.0 / 3.0).abs() < 1e-9);
    assert_eq!(stats.median_ms, 100.0);
    assert_eq!(stats.min_ms, 100.0);
    assert_eq!(stats.max_ms, 200.0);
    assert_eq!(stats.p95_ms, 200.0);
}

#[test]
fn test_empty_and_single_event_streams_yield_default_stats() {
    let analyzer = analyzer_over(&[]);
    assert_eq!(analyzer.stats().avg_ms, 0.0);

    let one = sample_events(&["a"], 0.0, 100.0);
    let analyzer = analyzer_over(&one);
    assert_eq!(analyzer.stats().max_ms, 0.0);
    assert!(analyzer.class_counts().is_empty());
}

#[test]
fn test_pauses_stay_out_of_stats_but_reach_the_log() {
    let events = vec![
        keymetry::snapshot::KeyEvent {
            symbol: "a".to_string(),
            timestamp_ms: 0.0,
        },
        keymetry::snapshot::KeyEvent {
            symbol: "b".to_string(),
            timestamp_ms: 100.0,
        },
        keymetry::snapshot::KeyEvent {
            symbol: "c".to_string(),
            timestamp_ms: 5100.0,
        },
        keymetry::snapshot::KeyEvent {
            symbol: "d".to_string(),
            timestamp_ms: 5200.0,
        },
    ];

    let analyzer = analyzer_over(&events);
    assert_eq!(analyzer.stats().max_ms, 100.0);
    assert_eq!(analyzer.class_counts()[&LatencyClass::Normal], 2);
    assert_eq!(analyzer.class_counts()[&LatencyClass::Pause], 1);

    // the 5000ms break still updates the pair aggregate
    let record = analyzer.transitions().get("b", "c").unwrap();
    assert_eq!(record.count, 1);
    assert_eq!(record.avg_ms(), 5000.0);
}

// --- HESITATIONS ---

#[test]
fn test_hesitation_captures_surrounding_context() {
    let mut events = sample_events(&["d", "e", "f", " ", "g"], 0.0, 100.0);
    events.extend(sample_events(&["h", "i", "j"], 1000.0, 100.0));

    let analyzer = analyzer_over(&events);
    let hesitations = analyzer.hesitations();
    assert_eq!(hesitations.len(), 1);

    let h = &hesitations[0];
    assert_eq!(h.prev_symbol, "g");
    assert_eq!(h.next_symbol, "h");
    assert_eq!(h.delay_ms, 600.0);
    assert_eq!(h.timestamp_ms, 1000.0);
    assert_eq!(h.context_before, vec!["d", "e", "f", " ", "g"]);
    assert_eq!(h.context_after, vec!["h", "i", "j"]);
}

#[test]
fn test_context_window_is_configurable() {
    let thresholds = TimingThresholds {
        context_window: 2,
        ..TimingThresholds::default()
    };
    let mut events = sample_events(&["a", "b", "c", "d"], 0.0, 100.0);
    events.extend(sample_events(&["e", "f", "g"], 1000.0, 100.0));

    let mut analyzer = TimingAnalyzer::new(thresholds);
    analyzer.ingest(&events);

    let h = &analyzer.hesitations()[0];
    assert_eq!(h.context_before, vec!["c", "d"]);
    assert_eq!(h.context_after, vec!["e", "f"]);
}

// --- TRANSITION LOG ---

#[test]
fn test_from_bigrams_synthesizes_flat_latency() {
    let mut bigrams = BTreeMap::new();
    bigrams.insert("ab".to_string(), 5u64);
    bigrams.insert("x".to_string(), 9u64); // too short, skipped

    let log = TransitionLog::from_bigrams(&bigrams, 150.0);
    assert_eq!(log.len(), 1);

    let record = log.get("a", "b").unwrap();
    assert_eq!(record.count, 5);
    assert_eq!(record.avg_ms(), 150.0);
    assert_eq!(record.min_ms, 150.0);
}

#[test]
fn test_from_cache_rehydrates_arrow_keys() {
    let mut cache = BTreeMap::new();
    cache.insert(
        "a→b".to_string(),
        TransitionCache {
            count: 7,
            avg_timing: 180.0,
            comfort_score: 0.0,
        },
    );
    cache.insert("garbage".to_string(), TransitionCache::default());

    let log = TransitionLog::from_cache(&cache);
    assert_eq!(log.len(), 1);
    assert_eq!(log.get("a", "b").unwrap().count, 7);
    assert_eq!(log.get("a", "b").unwrap().avg_ms(), 180.0);
}

// --- COMFORT ---

#[rstest]
#[case("a", "j", 70.0)] // hand alternation bonus
#[case("a", "s", 50.0)] // same hand, same row, nothing special
#[case("e", "d", 0.0)] // same finger and a row jump
#[case("h", "j", 10.0)] // same finger, no row data for h
#[case("q", "z", 0.0)] // same finger, two-row jump, clamped at zero
fn test_comfort_score_without_timing(#[case] from: &str, #[case] to: &str, #[case] expected: f64) {
    let log = TransitionLog::new();
    let model = FingerMap::standard();
    let weights = ComfortWeights::default();
    assert_eq!(log.comfort_score(&model, &weights, from, to), expected);
}

#[test]
fn test_comfort_rewards_fast_and_punishes_slow_pairs() {
    let model = FingerMap::standard();
    let weights = ComfortWeights::default();

    let mut log = TransitionLog::new();
    log.record("a", "j", 100.0);
    assert_eq!(log.comfort_score(&model, &weights, "a", "j"), 80.0);

    let mut log = TransitionLog::new();
    log.record("a", "s", 400.0);
    assert_eq!(log.comfort_score(&model, &weights, "a", "s"), 40.0);
}

#[test]
fn test_top_transitions_order_by_count() {
    let model = FingerMap::standard();
    let weights = ComfortWeights::default();

    let mut log = TransitionLog::new();
    for _ in 0..3 {
        log.record("a", "b", 100.0);
    }
    for _ in 0..5 {
        log.record("c", "d", 100.0);
    }

    let top = log.top(2, &model, &weights);
    assert_eq!(top.len(), 2);
    assert_eq!((top[0].from.as_str(), top[0].count), ("c", 5));
    assert_eq!((top[1].from.as_str(), top[1].count), ("a", 3));
}

#[test]
fn test_awkward_transitions_explain_themselves() {
    let model = FingerMap::standard();
    let weights = ComfortWeights::default();

    let mut log = TransitionLog::new();
    for _ in 0..6 {
        log.record("e", "d", 200.0); // same finger
        log.record("a", "j", 200.0); // comfortable, must not appear
    }

    let awkward = log.awkward(&model, &weights, 5);
    assert_eq!(awkward.len(), 1);
    assert_eq!(awkward[0].from, "e");
    assert_eq!(awkward[0].reason, "Same finger bigram");
}

#[test]
fn test_awkward_respects_the_count_floor() {
    let model = FingerMap::standard();
    let weights = ComfortWeights::default();

    let mut log = TransitionLog::new();
    log.record("e", "d", 200.0);
    assert!(log.awkward(&model, &weights, 5).is_empty());
}

#[test]
fn test_slow_transitions_sort_slowest_first() {
    let mut log = TransitionLog::new();
    for _ in 0..4 {
        log.record("a", "b", 400.0);
        log.record("c", "d", 600.0);
        log.record("e", "f", 100.0);
    }

    let slow = log.slow(300.0, 3);
    assert_eq!(slow.len(), 2);
    assert_eq!(slow[0].from, "c");
    assert_eq!(slow[0].avg_ms, 600.0);
    assert_eq!(slow[1].from, "a");
}
