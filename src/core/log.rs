use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use regex::Regex;
use std::io::Write;

const MAX_OP_WIDTH: usize = 48;

fn strip_ansi(re: &Regex, s: &str) -> String {
    re.replace_all(s, "").into_owned()
}

/// ANSI colour for each operation recorded in the `log` table
fn color_for_operation(op: &str) -> Colour {
    match op {
        "ingest" => Colour::Green,
        "export" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        other if other.starts_with("migrat") => Colour::Purple,
        _ => Colour::White,
    }
}

struct LogEntry {
    id: i64,
    date: String,
    operation: String,
    target: String,
    message: String,
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool, out: &mut impl Write) -> AppResult<()> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(raw_date);

            Ok(LogEntry {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        let entries = rows.collect::<rusqlite::Result<Vec<_>>>()?;

        if entries.is_empty() {
            writeln!(out, "📜 Internal log is empty.")?;
            return Ok(());
        }

        let ansi = Regex::new(r"\x1B\[[0-9;]*[mK]")
            .map_err(|e| AppError::Other(e.to_string()))?;

        let id_w = entries.iter().map(|e| e.id.to_string().len()).max().unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);
        let op_w = entries
            .iter()
            .map(|e| e.operation.len() + e.target.len() + 3)
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);

        writeln!(out, "📜 Internal log:\n")?;

        for e in entries {
            let colour = color_for_operation(&e.operation);

            let mut op_target = colour.paint(e.operation.as_str()).to_string();
            if !e.target.is_empty() {
                let room = MAX_OP_WIDTH.saturating_sub(e.operation.len() + 3);
                let target = if e.target.chars().count() > room {
                    let mut t: String = e.target.chars().take(room.saturating_sub(3)).collect();
                    t.push_str("...");
                    t
                } else {
                    e.target.clone()
                };
                op_target.push_str(&format!(" ({target})"));
            }

            // padding on the visible width, without escape codes
            let visible = strip_ansi(&ansi, &op_target).chars().count();
            let padding = " ".repeat(op_w.saturating_sub(visible));

            writeln!(
                out,
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                e.date,
                op_target,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            )?;
        }

        Ok(())
    }
}
