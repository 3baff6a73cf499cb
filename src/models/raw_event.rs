use chrono::NaiveDateTime;
use serde::Serialize;

/// Timestamp layout of `events.time` (fraction optional when parsing).
pub const STORE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// One row of the `events` table, exactly as stored.
#[derive(Debug, Clone, Serialize)]
pub struct RawEvent {
    pub id: i64,
    pub time: String,    // ⇔ events.time ("YYYY-MM-DD HH:MM:SS.ffffff")
    pub dev_id: i64,     // ⇔ events.dev_id (payload.user.id)
    pub payload: String, // ⇔ events.payload (webhook JSON body)
}

impl RawEvent {
    pub fn new(id: i64, time: &NaiveDateTime, dev_id: i64, payload: String) -> Self {
        Self {
            id,
            time: format_store_time(time),
            dev_id,
            payload,
        }
    }

    /// Parse the stored timestamp; `None` when the column holds garbage.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        parse_store_time(&self.time)
    }
}

pub fn format_store_time(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

pub fn parse_store_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, STORE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}
