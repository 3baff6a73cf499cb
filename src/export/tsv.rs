// src/export/tsv.rs

use crate::errors::{AppError, AppResult};
use std::io;
use std::path::Path;

/// Write one table as tab-separated values, with a leading `index` column
/// counting rows from zero.
pub(crate) fn write_table(path: &Path, headers: &[String], rows: &[Vec<String>]) -> AppResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .map_err(|e| AppError::from(io::Error::other(format!("TSV open error: {e}"))))?;

    let header = std::iter::once("index").chain(headers.iter().map(String::as_str));
    wtr.write_record(header)
        .map_err(|e| AppError::Export(format!("TSV write error: {e}")))?;

    for (i, row) in rows.iter().enumerate() {
        let index = i.to_string();
        let record = std::iter::once(index.as_str()).chain(row.iter().map(String::as_str));
        wtr.write_record(record)
            .map_err(|e| AppError::Export(format!("TSV write error: {e}")))?;
    }

    wtr.flush()?;
    Ok(())
}
