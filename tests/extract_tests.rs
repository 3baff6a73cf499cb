mod common;
use common::{at, payload, plain_payload};
use gltime::core::extract::{extract, extract_one, seconds_to_hours};
use gltime::errors::AppError;
use gltime::models::RawEvent;

fn event(id: i64, time: &str, body: String) -> RawEvent {
    RawEvent::new(id, &at(time), 7, body)
}

#[test]
fn test_extract_time_spent_delta() {
    let ev = event(
        1,
        "2024-01-15 10:00:00",
        payload("Alice", "grp", "proj", "Bug 1", 0, 5400),
    );

    let rec = extract_one(&ev).expect("valid payload").expect("time change");
    assert_eq!(rec.date, at("2024-01-15 10:00:00"));
    assert_eq!(rec.dev, "Alice");
    assert_eq!(rec.project, "grp/proj");
    assert_eq!(rec.issue, "Bug 1");
    assert_eq!(rec.month, "2024-01");
    assert_eq!(rec.time, 1.5);
}

#[test]
fn test_extract_negative_delta_uses_floor_division() {
    let ev = event(1, "2024-01-15 10:00:00", payload("A", "g", "p", "T", 5400, 0));
    let rec = extract_one(&ev).unwrap().unwrap();
    assert_eq!(rec.time, -1.5);
}

#[test]
fn test_seconds_to_hours_drops_leftover_seconds() {
    assert_eq!(seconds_to_hours(3600), 1.0);
    assert_eq!(seconds_to_hours(3661), 1.0 + 1.0 / 60.0);
    assert_eq!(seconds_to_hours(90), 1.0 / 60.0);
    assert_eq!(seconds_to_hours(59), 0.0);
    assert_eq!(seconds_to_hours(-60), -1.0 / 60.0);
    assert_eq!(seconds_to_hours(0), 0.0);
}

#[test]
fn test_event_without_time_change_is_skipped() {
    let ev = event(1, "2024-01-15 10:00:00", plain_payload("A"));
    assert!(extract_one(&ev).unwrap().is_none());
}

#[test]
fn test_missing_project_is_malformed() {
    let body = r#"{"user":{"id":1,"name":"A"},"object_attributes":{"title":"T"},"changes":{}}"#;
    let ev = event(1, "2024-01-15 10:00:00", body.to_string());
    assert!(matches!(extract_one(&ev), Err(AppError::MalformedPayload(_))));
}

#[test]
fn test_non_numeric_seconds_are_malformed() {
    let body = payload("A", "g", "p", "T", 0, 60).replace("\"current\":60", "\"current\":\"soon\"");
    let ev = event(1, "2024-01-15 10:00:00", body);
    assert!(matches!(extract_one(&ev), Err(AppError::MalformedPayload(_))));
}

#[test]
fn test_extract_batch_keeps_going_past_bad_rows() {
    let events = vec![
        event(1, "2024-01-15 10:00:00", payload("A", "g", "p", "T", 0, 3600)),
        event(2, "2024-01-15 11:00:00", "not json".to_string()),
        event(3, "2024-01-15 12:00:00", plain_payload("B")),
        event(4, "2024-01-15 13:00:00", payload("B", "g", "p", "T", 3600, 7200)),
    ];

    let out = extract(&events);
    assert_eq!(out.records.len(), 2);
    assert_eq!(out.skipped, 1);
    assert_eq!(out.malformed.len(), 1);
    assert_eq!(out.malformed[0].event_id, 2);
}

#[test]
fn test_bad_timestamp_is_malformed() {
    let mut ev = event(9, "2024-01-15 10:00:00", payload("A", "g", "p", "T", 0, 60));
    ev.time = "yesterday".to_string();

    let out = extract(&[ev]);
    assert!(out.records.is_empty());
    assert_eq!(out.malformed[0].event_id, 9);
    assert!(out.malformed[0].reason.contains("yesterday"));
}

/// Replace `total_time_spent` with the given JSON object text.
fn with_time_spent(spent: &str) -> String {
    let mut body: serde_json::Value =
        serde_json::from_str(&payload("A", "g", "p", "T", 0, 60)).unwrap();
    body["changes"]["total_time_spent"] = serde_json::from_str(spent).unwrap();
    body.to_string()
}

#[test]
fn test_each_required_key_is_checked() {
    let good = event(1, "2024-01-15 10:00:00", payload("A", "g", "p", "T", 0, 3600));

    for key in ["user", "project", "object_attributes", "changes"] {
        let mut body: serde_json::Value =
            serde_json::from_str(&payload("B", "g", "p", "T", 0, 60)).unwrap();
        body.as_object_mut().unwrap().remove(key);
        let bad = event(2, "2024-01-15 11:00:00", body.to_string());

        assert!(
            matches!(extract_one(&bad), Err(AppError::MalformedPayload(_))),
            "missing '{key}' should be malformed"
        );

        let out = extract(&[bad, good.clone()]);
        assert_eq!(out.records.len(), 1, "missing '{key}' stopped the batch");
        assert_eq!(out.malformed.len(), 1);
        assert!(out.malformed[0].reason.contains(key));
    }
}

#[test]
fn test_missing_previous_is_malformed() {
    let ev = event(1, "2024-01-15 10:00:00", with_time_spent(r#"{"current":60}"#));
    let out = extract(&[ev]);
    assert!(out.records.is_empty());
    assert!(out.malformed[0].reason.contains("total_time_spent.previous"));
}

#[test]
fn test_fractional_seconds_are_floored() {
    let ev = event(
        1,
        "2024-01-15 10:00:00",
        with_time_spent(r#"{"previous":0.9,"current":3600.7}"#),
    );
    let rec = extract_one(&ev).unwrap().unwrap();
    assert_eq!(rec.time, 1.0);
}

#[test]
fn test_extreme_seconds_do_not_abort_the_batch() {
    let good = event(1, "2024-01-15 10:00:00", payload("A", "g", "p", "T", 0, 3600));
    let cases = [
        r#"{"previous":-9223372036854775808,"current":3600}"#,
        r#"{"previous":9223372036854775807,"current":-3600}"#,
        r#"{"previous":0,"current":1e300}"#,
        r#"{"previous":-1e19,"current":0}"#,
        r#"{"previous":0,"current":18446744073709551615}"#,
    ];

    for spent in cases {
        let bad = event(2, "2024-01-15 11:00:00", with_time_spent(spent));
        assert!(
            matches!(extract_one(&bad), Err(AppError::MalformedPayload(_))),
            "{spent} should be malformed"
        );

        let out = extract(&[good.clone(), bad]);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].time, 1.0);
        assert_eq!(out.malformed.len(), 1);
        assert_eq!(out.malformed[0].event_id, 2);
    }
}
