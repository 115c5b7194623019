mod common;

use common::SnapshotBuilder;
use keymetry::ergonomics::{assess, Finger, FingerMap, Hand};
use rstest::rstest;

// --- FINGER MAPPING ---

#[test]
fn test_home_row_maps_to_expected_fingers() {
    let map = FingerMap::standard();
    assert_eq!(map.finger_for("a"), Some(Finger::LeftPinky));
    assert_eq!(map.finger_for("s"), Some(Finger::LeftRing));
    assert_eq!(map.finger_for("d"), Some(Finger::LeftMiddle));
    assert_eq!(map.finger_for("f"), Some(Finger::LeftIndex));
    assert_eq!(map.finger_for("j"), Some(Finger::RightIndex));
    assert_eq!(map.finger_for(";"), Some(Finger::RightPinky));
    assert_eq!(map.finger_for("space"), Some(Finger::LeftThumb));
}

#[test]
fn test_hands_split_down_the_middle() {
    let map = FingerMap::standard();
    assert_eq!(map.hand_for("t"), Some(Hand::Left));
    assert_eq!(map.hand_for("y"), Some(Hand::Right));
    assert_eq!(map.hand_for("unmapped-symbol"), None);
}

#[rstest]
#[case("q", "z", 2)] // top row to bottom row
#[case("a", "q", 1)] // home to top
#[case("a", "s", 0)] // same row
#[case("space", "a", 0)] // no position for space
fn test_row_jump_cases(#[case] a: &str, #[case] b: &str, #[case] expected: u32) {
    let map = FingerMap::standard();
    assert_eq!(map.row_jump(a, b), expected);
}

// --- RATES ---

#[test]
fn test_sfb_rate_counts_same_finger_pairs() {
    let map = FingerMap::standard();
    // "ed": both left middle. "aj": pinky then index, not an SFB.
    let snapshot = SnapshotBuilder::new()
        .bigram("ed", 10)
        .bigram("aj", 10)
        .build();
    assert_eq!(map.sfb_rate(&snapshot.bigrams), 50.0);
}

#[test]
fn test_alternation_rate_counts_hand_changes() {
    let map = FingerMap::standard();
    // "aj" crosses hands, "as" stays left.
    let snapshot = SnapshotBuilder::new()
        .bigram("aj", 30)
        .bigram("as", 10)
        .build();
    assert_eq!(map.hand_alternation_rate(&snapshot.bigrams), 75.0);
}

#[test]
fn test_rates_are_zero_for_empty_tables() {
    let map = FingerMap::standard();
    let snapshot = SnapshotBuilder::new().build();
    assert_eq!(map.sfb_rate(&snapshot.bigrams), 0.0);
    assert_eq!(map.hand_alternation_rate(&snapshot.bigrams), 0.0);
}

#[test]
fn test_unmapped_bigram_symbols_stay_in_the_denominator() {
    let map = FingerMap::standard();
    let snapshot = SnapshotBuilder::new()
        .bigram("ed", 10)
        .bigram("仮名", 10)
        .build();
    assert_eq!(map.sfb_rate(&snapshot.bigrams), 50.0);
}

// --- FINGER LOAD ---

#[test]
fn test_finger_load_keeps_unmapped_keystrokes_in_total() {
    let map = FingerMap::standard();
    let snapshot = SnapshotBuilder::new().key("e", 50).key("仮", 50).build();

    let load = map.finger_load(&snapshot.keys);
    let left_middle = load
        .iter()
        .find(|(f, _)| *f == Finger::LeftMiddle)
        .map(|(_, share)| *share)
        .unwrap();
    assert_eq!(left_middle, 50.0);

    let sum: f64 = load.iter().map(|(_, share)| share).sum();
    assert!(sum < 100.0, "unmapped keys must dilute the shares");
}

#[test]
fn test_finger_load_lists_every_finger() {
    let map = FingerMap::standard();
    let snapshot = SnapshotBuilder::new().key("e", 10).build();
    let load = map.finger_load(&snapshot.keys);
    assert_eq!(load.len(), 10);
    assert!(load
        .iter()
        .any(|(f, share)| *f == Finger::RightPinky && *share == 0.0));
}

// --- ASSESSMENT ---

#[test]
fn test_assessment_flags_high_sfb_and_low_alternation() {
    let loads = vec![(Finger::LeftIndex, 15.0), (Finger::RightPinky, 5.0)];
    let assessment = assess(5.0, 40.0, &loads);

    assert_eq!(assessment.issues.len(), 2);
    assert!(assessment.issues[0].contains("same-finger bigram rate"));
    assert!(assessment.issues[1].contains("Low hand alternation"));
    // 100 - (5-2)*10 - (60-40)*0.5
    assert_eq!(assessment.overall_score, 60.0);
}

#[test]
fn test_assessment_flags_an_overused_finger() {
    let loads = vec![(Finger::RightIndex, 40.0), (Finger::LeftPinky, 1.0)];
    let assessment = assess(1.0, 70.0, &loads);
    assert!(assessment
        .issues
        .iter()
        .any(|i| i.contains("right_index is overused")));
    assert_eq!(assessment.overall_score, 100.0);
}

#[test]
fn test_clean_typing_passes_without_issues() {
    let loads = vec![(Finger::LeftIndex, 12.0), (Finger::RightIndex, 11.0)];
    let assessment = assess(1.0, 70.0, &loads);
    assert!(assessment.issues.is_empty());
    assert!(assessment.recommendations.is_empty());
    assert_eq!(assessment.overall_score, 100.0);
}

#[test]
fn test_usage_report_orders_most_and_least_used() {
    let map = FingerMap::standard();
    let snapshot = SnapshotBuilder::new()
        .key("e", 500)
        .key("a", 100)
        .key("j", 50)
        .bigram("ea", 10)
        .build();

    let report = map.usage_report(&snapshot.keys, &snapshot.bigrams);
    assert_eq!(report.finger_load.len(), 10);
    assert_eq!(report.most_used[0].0, Finger::LeftMiddle);
    assert_eq!(report.most_used.len(), 5);
    assert_eq!(report.least_used.len(), 5);
    assert!(report.most_used[0].1 >= report.least_used[4].1);
}
