use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Columns every event store must carry, whoever created it.
const EVENTS_COLUMNS: [&str; 4] = ["id", "time", "dev_id", "payload"];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if a table exists.
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Column names of the `events` table.
fn events_columns(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("PRAGMA table_info('events')")?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;
    cols.collect()
}

/// Create the append-only `events` table.
fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            time     DATETIME NOT NULL,
            dev_id   INTEGER NOT NULL,
            payload  JSON NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn ensure_event_indexes(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_events_time ON events(time);
        CREATE INDEX IF NOT EXISTS idx_events_dev_id ON events(dev_id);
        "#,
    )?;
    Ok(())
}

/// Public entry point: bring a store up to the current schema.
///
/// Stores written by an older receiver already have `events`; they only
/// gain the `log` table and the indexes.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    if !table_exists(conn, "events")? {
        create_events_table(conn)?;
        success("Created events table.");
    } else {
        let present = events_columns(conn)?;
        let missing: Vec<&str> = EVENTS_COLUMNS
            .iter()
            .copied()
            .filter(|c| !present.iter().any(|p| p == c))
            .collect();

        if !missing.is_empty() {
            return Err(AppError::Migration(format!(
                "events table is missing column(s): {}",
                missing.join(", ")
            )));
        }
    }

    ensure_event_indexes(conn)?;
    Ok(())
}
