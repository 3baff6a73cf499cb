//! Webhook payload → normalized record extraction.
//!
//! Only issue/merge-request hooks whose `changes` carry a
//! `total_time_spent` transition produce a record. Everything else is
//! counted as skipped. Payloads missing the keys a GitLab hook always has
//! are malformed: they are collected and reported, never fatal.

use crate::errors::{AppError, AppResult};
use crate::models::{NormalizedRecord, RawEvent};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedPayload {
    pub event_id: i64,
    pub reason: String,
}

/// Outcome of one extraction batch.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<NormalizedRecord>,
    /// Well-formed events without a time-tracking change
    pub skipped: usize,
    pub malformed: Vec<MalformedPayload>,
}

pub fn extract(events: &[RawEvent]) -> Extraction {
    let mut out = Extraction::default();

    for ev in events {
        match extract_one(ev) {
            Ok(Some(record)) => out.records.push(record),
            Ok(None) => out.skipped += 1,
            Err(e) => out.malformed.push(MalformedPayload {
                event_id: ev.id,
                reason: match e {
                    AppError::MalformedPayload(reason) => reason,
                    other => other.to_string(),
                },
            }),
        }
    }

    out
}

/// Extract a single event. `Ok(None)` means "not a time-tracking event".
pub fn extract_one(event: &RawEvent) -> AppResult<Option<NormalizedRecord>> {
    let date = event
        .timestamp()
        .ok_or_else(|| malformed(format!("invalid timestamp '{}'", event.time)))?;

    let payload: Value = serde_json::from_str(&event.payload)
        .map_err(|e| malformed(format!("payload is not valid JSON ({e})")))?;

    let user = field(&payload, "user")?;
    let project = field(&payload, "project")?;
    let changes = field(&payload, "changes")?;
    let metadata = field(&payload, "object_attributes")?;

    let Some(spent) = changes.get("total_time_spent") else {
        return Ok(None);
    };

    let previous = seconds(spent, "previous")?;
    let current = seconds(spent, "current")?;
    let delta = current
        .checked_sub(previous)
        .ok_or_else(|| malformed("total_time_spent delta out of range"))?;

    let record = NormalizedRecord::new(
        date,
        string(user, "user", "name")?,
        format!(
            "{}/{}",
            string(project, "project", "namespace")?,
            string(project, "project", "name")?
        ),
        seconds_to_hours(delta),
        string(metadata, "object_attributes", "title")?,
    );

    Ok(Some(record))
}

/// Whole hours plus whole minutes; leftover seconds are dropped.
/// Floor division keeps negative deltas consistent: -5400s → -1.5h.
pub fn seconds_to_hours(delta: i64) -> f64 {
    let hours = delta.div_euclid(3600);
    let minutes = delta.rem_euclid(3600).div_euclid(60);
    hours as f64 + minutes as f64 / 60.0
}

/// `payload.user.id`, required when storing an event.
pub fn developer_id(payload: &Value) -> AppResult<i64> {
    field(payload, "user")?
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| malformed("missing event user ID in payload JSON"))
}

fn malformed(reason: impl Into<String>) -> AppError {
    AppError::MalformedPayload(reason.into())
}

fn field<'a>(payload: &'a Value, key: &str) -> AppResult<&'a Value> {
    payload
        .get(key)
        .ok_or_else(|| malformed(format!("missing '{key}'")))
}

fn string(object: &Value, parent: &str, key: &str) -> AppResult<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| malformed(format!("missing '{parent}.{key}'")))
}

fn seconds(spent: &Value, key: &str) -> AppResult<i64> {
    let value = spent
        .get(key)
        .ok_or_else(|| malformed(format!("missing 'total_time_spent.{key}'")))?;

    if let Some(n) = value.as_i64() {
        return Ok(n);
    }

    let f = value
        .as_f64()
        .ok_or_else(|| malformed(format!("'total_time_spent.{key}' is not a number")))?
        .floor();

    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if !f.is_finite() || f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return Err(malformed(format!("'total_time_spent.{key}' is out of range")));
    }
    Ok(f as i64)
}
