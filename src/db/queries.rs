use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::RawEvent;
use crate::models::raw_event::format_store_time;
use chrono::NaiveDateTime;
use rusqlite::params;
use rusqlite::{Connection, Result, Row};

/// Every stored event, oldest first.
pub fn load_raw_events(pool: &DbPool) -> AppResult<Vec<RawEvent>> {
    let mut stmt = pool.conn.prepare(
        "SELECT id, time, dev_id, payload FROM events
         ORDER BY time ASC, id ASC",
    )?;

    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn map_row(row: &Row) -> Result<RawEvent> {
    Ok(RawEvent {
        id: row.get("id")?,
        time: row.get("time")?,
        dev_id: row.get("dev_id")?,
        payload: row.get("payload")?,
    })
}

/// Append one webhook body. Returns the new event id.
pub fn insert_event(
    conn: &Connection,
    time: &NaiveDateTime,
    dev_id: i64,
    payload: &str,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO events (time, dev_id, payload) VALUES (?1, ?2, ?3)",
        params![format_store_time(time), dev_id, payload],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn count_events(conn: &Connection) -> AppResult<i64> {
    let n = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
    Ok(n)
}
