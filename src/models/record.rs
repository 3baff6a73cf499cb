use super::column::Column;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;

/// A time-tracking fact extracted from one webhook payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub date: NaiveDateTime, // index
    pub dev: String,         // payload.user.name
    pub project: String,     // "{namespace}/{name}"
    pub time: f64,           // hours, negative when time was removed
    pub issue: String,       // object_attributes.title
    pub month: String,       // "YYYY-MM" of `date`
}

impl NormalizedRecord {
    pub fn new(
        date: NaiveDateTime,
        dev: impl Into<String>,
        project: impl Into<String>,
        time: f64,
        issue: impl Into<String>,
    ) -> Self {
        Self {
            date,
            dev: dev.into(),
            project: project.into(),
            time,
            issue: issue.into(),
            month: month_label(&date),
        }
    }

    /// Value of a categorical column.
    pub fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::Dev => Some(&self.dev),
            Column::Project => Some(&self.project),
            Column::Issue => Some(&self.issue),
            Column::Month => Some(&self.month),
            Column::Date | Column::Time => None,
        }
    }

    /// Value of a numeric column.
    pub fn amount(&self, column: Column) -> Option<f64> {
        match column {
            Column::Time => Some(self.time),
            _ => None,
        }
    }

    /// Cell rendering used by list output.
    pub fn display(&self, column: Column) -> String {
        match column {
            Column::Date => self.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            Column::Time => format!("{:.2}", self.time),
            other => self.text(other).unwrap_or_default().to_string(),
        }
    }

    pub fn compare_by(&self, other: &Self, column: Column) -> Ordering {
        match column {
            Column::Date => self.date.cmp(&other.date),
            Column::Time => self.time.total_cmp(&other.time),
            c => self.text(c).cmp(&other.text(c)),
        }
    }
}

pub fn month_label(date: &NaiveDateTime) -> String {
    date.format("%Y-%m").to_string()
}
