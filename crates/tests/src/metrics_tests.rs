use serde_json::json;

use meetra_services::analytics::metrics::{
    completion_rate, minutes_between, participation_percentage, round2, violations_count,
    Mean,
};

use crate::fixtures::seed::dt;

#[test]
fn completion_rate_handles_zero_totals() {
    assert_eq!(completion_rate(0, 0), 0.0);
    assert_eq!(completion_rate(3, 4), 75.0);
    assert_eq!(completion_rate(1, 3), 33.33);
}

#[test]
fn participation_percentage_is_undefined_without_a_denominator() {
    assert_eq!(participation_percentage(30.0, None), None);
    assert_eq!(participation_percentage(30.0, Some(0.0)), None);
    assert_eq!(participation_percentage(30.0, Some(-5.0)), None);
    assert_eq!(participation_percentage(30.0, Some(60.0)), Some(50.0));
    // A computed zero is still a defined ratio
    assert_eq!(participation_percentage(0.0, Some(60.0)), Some(0.0));
}

#[test]
fn violations_count_sums_the_itemized_lists() {
    let payload = json!({
        "warnings": [{"t": 1}, {"t": 2}],
        "detections": [{"t": 3}],
        "continuous_removals": [],
    });
    assert_eq!(violations_count(Some(&payload), Some(9)), 3);
}

#[test]
fn violations_count_accepts_encoded_strings_and_aliases() {
    let encoded = json!(r#"{"warnings": [1], "detection_events": [2, 3], "removals": [4]}"#);
    assert_eq!(violations_count(Some(&encoded), Some(9)), 4);
}

#[test]
fn violations_count_falls_back_on_garbage() {
    let garbage = json!("not json");
    assert_eq!(violations_count(Some(&garbage), Some(7)), 7);

    let not_an_object = json!([1, 2, 3]);
    assert_eq!(violations_count(Some(&not_an_object), Some(5)), 5);

    assert_eq!(violations_count(None, Some(2)), 2);
    assert_eq!(violations_count(None, None), 0);
}

#[test]
fn violations_count_of_an_empty_object_is_zero_not_fallback() {
    let empty = json!({});
    assert_eq!(violations_count(Some(&empty), Some(9)), 0);
}

#[test]
fn mean_ignores_nulls_and_reports_zero_when_empty() {
    let mut mean = Mean::new();
    assert_eq!(mean.value(), 0.0);

    mean.push(Some(10.0));
    mean.push(None);
    mean.push(Some(20.0));
    assert_eq!(mean.value(), 15.0);

    let mut thirds = Mean::new();
    thirds.push(Some(1.0));
    thirds.push(Some(1.0));
    thirds.push(Some(2.0));
    assert_eq!(thirds.value(), 1.33);
}

#[test]
fn minutes_between_requires_both_endpoints() {
    let start = Some(dt("2024-01-10T09:05:00Z"));
    let end = Some(dt("2024-01-10T10:05:00Z"));
    assert_eq!(minutes_between(start, end), Some(60.0));
    assert_eq!(minutes_between(start, None), None);
    assert_eq!(minutes_between(None, end), None);
}

#[test]
fn round2_keeps_two_decimal_places() {
    assert_eq!(round2(33.333333), 33.33);
    assert_eq!(round2(66.666666), 66.67);
    assert_eq!(round2(75.0), 75.0);
}
