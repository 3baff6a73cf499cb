//! In-memory table of normalized records, indexed and sorted by date.

use crate::core::extract::{self, MalformedPayload};
use crate::core::groups::Groups;
use crate::core::monthly::{MonthlyTotal, bucket_monthly};
use crate::core::remote;
use crate::core::selection::Selection;
use crate::db::pool::DbPool;
use crate::db::queries::load_raw_events;
use crate::errors::{AppError, AppResult};
use crate::models::record::month_label;
use crate::models::{Column, ColumnSpec, NormalizedRecord};
use crate::utils::path::expand_tilde;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Where records come from.
#[derive(Debug, Clone)]
pub enum Source {
    /// One SQLite event store
    Database(PathBuf),
    /// Every `*.db` store inside a directory
    Directory(PathBuf),
    /// A dataset serialized with [`Dataset::to_text`]
    Text(String),
    /// An already extracted table
    Records(Vec<NormalizedRecord>),
    /// The receiver's `/events` endpoint
    Remote { url: String, token: Option<String> },
}

impl Source {
    /// Classify a CLI path: directory, `.json` dataset, or event store.
    pub fn from_path(path: &str) -> AppResult<Self> {
        let p = expand_tilde(path);

        if p.is_dir() {
            return Ok(Source::Directory(p));
        }

        let is_json = p
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Ok(Source::Text(fs::read_to_string(&p)?))
        } else {
            Ok(Source::Database(p))
        }
    }
}

/// Counters collected while loading.
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    pub stores: usize,
    pub events: usize,
    pub skipped: usize,
    pub malformed: Vec<MalformedPayload>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    records: Vec<NormalizedRecord>,
    date_min: Option<NaiveDateTime>,
    date_max: Option<NaiveDateTime>,
    monthly_totals: Vec<MonthlyTotal>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from an existing table: sort by date and derive the monthly totals.
    pub fn from_records(mut records: Vec<NormalizedRecord>) -> Self {
        // stable: equal timestamps keep their load order
        records.sort_by(|a, b| a.date.cmp(&b.date));

        let date_min = records.first().map(|r| r.date);
        let date_max = records.last().map(|r| r.date);
        let monthly_totals = bucket_monthly(&records, Column::Time);

        Self {
            records,
            date_min,
            date_max,
            monthly_totals,
        }
    }

    pub fn load(sources: &[Source]) -> AppResult<Self> {
        Self::load_with_stats(sources).map(|(ds, _)| ds)
    }

    /// Read every source, extract, concatenate and sort.
    pub fn load_with_stats(sources: &[Source]) -> AppResult<(Self, LoadStats)> {
        if sources.is_empty() {
            return Err(AppError::EmptyInput);
        }

        let mut stats = LoadStats::default();
        let mut records = Vec::new();

        for source in sources {
            match source {
                Source::Database(path) => {
                    records.extend(load_store(path, &mut stats)?);
                }
                Source::Directory(dir) => {
                    for path in stores_in(dir)? {
                        records.extend(load_store(&path, &mut stats)?);
                    }
                }
                Source::Text(text) => records.extend(Self::from_text(text)?.records),
                Source::Records(rs) => records.extend(rs.iter().cloned()),
                Source::Remote { url, token } => {
                    let text = remote::fetch_events(url, token.as_deref())?;
                    records.extend(Self::from_text(&text)?.records);
                }
            }
        }

        Ok((Self::from_records(records), stats))
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn date_min(&self) -> Option<NaiveDateTime> {
        self.date_min
    }

    pub fn date_max(&self) -> Option<NaiveDateTime> {
        self.date_max
    }

    /// Hours per calendar month, gap-free from the first to the last month.
    pub fn monthly_totals(&self) -> &[MonthlyTotal] {
        &self.monthly_totals
    }

    /// The month axis shared by every chart of this dataset.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.monthly_totals.iter().map(|t| t.month).collect()
    }

    pub fn total(&self, column: Column) -> AppResult<f64> {
        let column = column.ensure_numeric()?;
        Ok(self.records.iter().filter_map(|r| r.amount(column)).sum())
    }

    /// New dataset with the records matching every predicate.
    pub fn subselect(&self, selection: &Selection) -> Dataset {
        Self::from_records(
            self.records
                .iter()
                .filter(|r| selection.matches(r))
                .cloned()
                .collect(),
        )
    }

    pub fn group(&self, columns: impl Into<ColumnSpec>) -> AppResult<Groups<'_>> {
        Groups::new(self, columns.into())
    }

    /// Column-oriented JSON: `{column: {index: value}}`, where the index is
    /// the record timestamp in epoch milliseconds.
    pub fn to_text(&self) -> AppResult<String> {
        let mut seen = HashSet::new();
        let mut dev = Map::new();
        let mut project = Map::new();
        let mut time = Map::new();
        let mut issue = Map::new();
        let mut month = Map::new();

        for r in &self.records {
            let key = r.date.and_utc().timestamp_millis().to_string();
            if !seen.insert(key.clone()) {
                return Err(AppError::NonUniqueIndex(format!(
                    "more than one record at {}",
                    r.date
                )));
            }

            dev.insert(key.clone(), Value::from(r.dev.as_str()));
            project.insert(key.clone(), Value::from(r.project.as_str()));
            time.insert(key.clone(), Value::from(r.time));
            issue.insert(key.clone(), Value::from(r.issue.as_str()));
            month.insert(key, Value::from(r.month.as_str()));
        }

        let mut table = Map::new();
        table.insert(Column::Dev.to_string(), Value::Object(dev));
        table.insert(Column::Project.to_string(), Value::Object(project));
        table.insert(Column::Time.to_string(), Value::Object(time));
        table.insert(Column::Issue.to_string(), Value::Object(issue));
        table.insert(Column::Month.to_string(), Value::Object(month));

        Ok(serde_json::to_string(&Value::Object(table))?)
    }

    /// Rebuild a dataset from [`Dataset::to_text`] output.
    pub fn from_text(text: &str) -> AppResult<Self> {
        let table: Value = serde_json::from_str(text)?;

        let dev = column_of(&table, Column::Dev)?;
        let project = column_of(&table, Column::Project)?;
        let time = column_of(&table, Column::Time)?;
        let issue = column_of(&table, Column::Issue)?;
        let month = table.get(Column::Month.as_str()).and_then(Value::as_object);

        let mut records = Vec::with_capacity(dev.len());

        for (key, dev_value) in dev {
            let date = parse_index(key)?;
            let cell = |col: &Map<String, Value>, name: &str| -> AppResult<String> {
                col.get(key)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| invalid_text(format!("no '{name}' value at index {key}")))
            };

            let hours = time
                .get(key)
                .and_then(Value::as_f64)
                .ok_or_else(|| invalid_text(format!("no 'time' value at index {key}")))?;

            records.push(NormalizedRecord {
                date,
                dev: dev_value
                    .as_str()
                    .ok_or_else(|| invalid_text(format!("no 'dev' value at index {key}")))?
                    .to_string(),
                project: cell(project, "project")?,
                time: hours,
                issue: cell(issue, "issue")?,
                month: match month {
                    Some(m) => cell(m, "month")?,
                    None => month_label(&date),
                },
            });
        }

        Ok(Self::from_records(records))
    }
}

fn invalid_text(reason: String) -> AppError {
    AppError::MalformedPayload(format!("dataset text: {reason}"))
}

fn column_of(table: &Value, column: Column) -> AppResult<&Map<String, Value>> {
    table
        .get(column.as_str())
        .and_then(Value::as_object)
        .ok_or_else(|| invalid_text(format!("missing column '{column}'")))
}

fn parse_index(key: &str) -> AppResult<NaiveDateTime> {
    key.parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| AppError::InvalidDate(format!("dataset index '{key}'")))
}

fn load_store(path: &Path, stats: &mut LoadStats) -> AppResult<Vec<NormalizedRecord>> {
    let pool = DbPool::open_read_only(path)?;
    let events = load_raw_events(&pool)?;
    let extraction = extract::extract(&events);

    stats.stores += 1;
    stats.events += events.len();
    stats.skipped += extraction.skipped;
    stats.malformed.extend(extraction.malformed);

    Ok(extraction.records)
}

/// `*.db` files of a directory, in name order.
fn stores_in(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let mut out: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().map(|e| e == "db").unwrap_or(false))
        .collect();
    out.sort();
    Ok(out)
}
