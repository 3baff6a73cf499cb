//! Plain-text reports: record listings and nested time totals.

use crate::core::Dataset;
use crate::errors::AppResult;
use crate::models::Column;
use crate::utils::table::Table;
use std::io::Write;

/// A work week, used to switch from hours to weeks in totals.
pub const HOURS_PER_WEEK: f64 = 40.0;

pub const DEFAULT_LIST_COLUMNS: [Column; 3] = [Column::Project, Column::Dev, Column::Time];

/// `37.5` → `"37.5h"`, `45` → `"1.1w"`.
///
/// The switch to weeks is decided on the value as printed, so anything that
/// would read `40h` is shown in weeks.
pub fn format_hours(hours: f64) -> String {
    let shown = (hours * 100.0).round() / 100.0;
    if shown < HOURS_PER_WEEK {
        format!("{}h", trim_decimals(shown))
    } else {
        format!("{:.1}w", hours / HOURS_PER_WEEK)
    }
}

/// Two decimals at most, trailing zeros dropped.
fn trim_decimals(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Print every record (date first), then the summed time.
pub fn print_list(
    ds: &Dataset,
    out: &mut impl Write,
    columns: &[Column],
    sort: Option<Column>,
    tail: Option<usize>,
) -> AppResult<()> {
    if ds.is_empty() {
        writeln!(out, "Empty dataset.")?;
        return Ok(());
    }

    let mut records: Vec<_> = ds.records().iter().collect();
    if let Some(col) = sort {
        records.sort_by(|a, b| a.compare_by(b, col));
    }

    let columns: Vec<Column> = columns
        .iter()
        .copied()
        .filter(|c| *c != Column::Date)
        .collect();

    let mut table = Table::new(
        std::iter::once(Column::Date.as_str()).chain(columns.iter().map(Column::as_str)),
    );
    for r in records {
        table.add_row(
            std::iter::once(Column::Date)
                .chain(columns.iter().copied())
                .map(|c| r.display(c))
                .collect(),
        );
    }

    let rendered = table.render();
    match tail {
        Some(n) if n > 0 => {
            writeln!(out, "Printing last {n} entries:")?;
            let lines: Vec<&str> = rendered.lines().collect();
            for line in &lines[lines.len().saturating_sub(n)..] {
                writeln!(out, "{line}")?;
            }
        }
        _ => write!(out, "{rendered}")?,
    }

    writeln!(out)?;
    writeln!(out, "total time = {:.1}h", ds.total(Column::Time)?)?;
    Ok(())
}

/// Nested totals: one indentation level per entry of `levels`.
///
/// Each level is ordered by time spent, or alphabetically when it appears
/// in `sort_levels`.
pub fn print_totals(
    ds: &Dataset,
    out: &mut impl Write,
    levels: &[Column],
    sort_levels: &[Column],
) -> AppResult<()> {
    print_totals_at(ds, out, levels, sort_levels, 0)
}

fn print_totals_at(
    ds: &Dataset,
    out: &mut impl Write,
    levels: &[Column],
    sort_levels: &[Column],
    depth: usize,
) -> AppResult<()> {
    let Some((&level, rest)) = levels.split_first() else {
        return Ok(());
    };

    let mut groups = ds.group(level)?.reorder(Some(Column::Time), false)?;
    if sort_levels.contains(&level) {
        groups = groups.sort_by_name();
    }

    let indent = " ".repeat(4 * depth);
    for (name, sub) in groups.iter() {
        writeln!(
            out,
            "{indent}{name}: {}",
            format_hours(sub.total(Column::Time)?)
        )?;
        print_totals_at(&sub, out, rest, sort_levels, depth + 1)?;
    }

    if depth == 1 {
        writeln!(out)?;
    }

    Ok(())
}

/// Recent records, then totals by developer and by project.
pub fn print_summary(ds: &Dataset, out: &mut impl Write, tail: usize) -> AppResult<()> {
    print_list(ds, out, &DEFAULT_LIST_COLUMNS, None, Some(tail))?;

    writeln!(out, "=== Devs ===\n")?;
    print_totals(
        ds,
        out,
        &[Column::Dev, Column::Project, Column::Issue],
        &[Column::Project, Column::Dev],
    )?;

    writeln!(out, "=== Projects ===\n")?;
    print_totals(
        ds,
        out,
        &[Column::Project, Column::Dev, Column::Issue],
        &[Column::Project, Column::Dev],
    )?;

    Ok(())
}
