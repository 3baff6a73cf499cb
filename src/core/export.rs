use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::notify_export_success;
use crate::export::tsv::write_table;
use crate::ui::messages::{info, warning};
use rusqlite::types::ValueRef;
use std::io;
use std::path::{Path, PathBuf};

/// Raw dump of the event store: one tab-separated file per table.
pub struct ExportLogic;

impl ExportLogic {
    /// Export every user table of the store.
    ///
    /// `file` is a template: `dump.tsv` produces `dump.events.tsv`,
    /// `dump.log.tsv`, …
    pub fn export(pool: &mut DbPool, file: &str, force: bool) -> AppResult<Vec<PathBuf>> {
        let template = Path::new(file);

        if !template.is_absolute() {
            return Err(AppError::from(io::Error::other(format!(
                "Output file path must be absolute: {file}"
            ))));
        }

        let tables = list_tables(pool)?;
        if tables.is_empty() {
            warning("No tables found in the event store.");
            return Ok(Vec::new());
        }

        let mut written = Vec::new();

        for table in tables {
            let path = table_path(template, &table);
            ensure_writable(&path, force)?;

            info(format!("Exporting table '{table}' to {}", path.display()));
            let (headers, rows) = read_table(pool, &table)?;
            write_table(&path, &headers, &rows)?;

            notify_export_success(&table, &path);
            written.push(path);
        }

        ttlog_quiet(
            &pool.conn,
            "export",
            file,
            &format!("Exported {} table(s)", written.len()),
        );

        Ok(written)
    }
}

/// `dir/dump.tsv` + `events` → `dir/dump.events.tsv`
pub fn table_path(template: &Path, table: &str) -> PathBuf {
    let stem = template
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "dump".to_string());
    let ext = template
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "tsv".to_string());

    template.with_file_name(format!("{stem}.{table}.{ext}"))
}

fn list_tables(pool: &DbPool) -> AppResult<Vec<String>> {
    let mut stmt = pool.conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type='table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name ASC",
    )?;

    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

fn read_table(pool: &DbPool, table: &str) -> AppResult<(Vec<String>, Vec<Vec<String>>)> {
    // table names come from sqlite_master, quoting guards odd names
    let sql = format!("SELECT * FROM \"{}\"", table.replace('"', "\"\""));
    let mut stmt = pool.conn.prepare(&sql)?;

    let headers: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = headers.len();

    let mut rows = Vec::new();
    let mut query = stmt.query([])?;
    while let Some(row) = query.next()? {
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            cells.push(cell_to_string(row.get_ref(i)?));
        }
        rows.push(cells);
    }

    Ok((headers, rows))
}

fn cell_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).to_string(),
        ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
    }
}
