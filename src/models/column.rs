use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Columns of a normalized record. `date` is the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Date,
    Dev,
    Project,
    Time,
    Issue,
    Month,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Date,
        Column::Dev,
        Column::Project,
        Column::Time,
        Column::Issue,
        Column::Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Date => "date",
            Column::Dev => "dev",
            Column::Project => "project",
            Column::Time => "time",
            Column::Issue => "issue",
            Column::Month => "month",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Columns whose values can name a group or be matched by `subselect`.
    pub fn is_categorical(&self) -> bool {
        matches!(
            self,
            Column::Dev | Column::Project | Column::Issue | Column::Month
        )
    }

    /// Columns that can be summed.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Time)
    }

    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> AppResult<Vec<Column>> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }

    pub fn ensure_numeric(self) -> AppResult<Self> {
        if self.is_numeric() {
            Ok(self)
        } else {
            Err(AppError::InvalidColumns(format!(
                "'{self}' is not a numeric column"
            )))
        }
    }
}

impl FromStr for Column {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| AppError::InvalidColumns(format!("unknown column '{s}'")))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping columns: one name or several, validated before any partitioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    Single(Column),
    Multiple(Vec<Column>),
}

impl ColumnSpec {
    pub fn parse<S: AsRef<str>>(names: &[S]) -> AppResult<Self> {
        let mut columns = Column::parse_list(names)?;
        let spec = if columns.len() == 1 {
            ColumnSpec::Single(columns.remove(0))
        } else {
            ColumnSpec::Multiple(columns)
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn columns(&self) -> &[Column] {
        match self {
            ColumnSpec::Single(c) => std::slice::from_ref(c),
            ColumnSpec::Multiple(cs) => cs,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        let columns = self.columns();
        if columns.is_empty() {
            return Err(AppError::InvalidColumns("no grouping column given".into()));
        }
        if let Some(bad) = columns.iter().find(|c| !c.is_categorical()) {
            return Err(AppError::InvalidColumns(format!(
                "'{bad}' is not a categorical column"
            )));
        }
        Ok(())
    }
}

impl From<Column> for ColumnSpec {
    fn from(column: Column) -> Self {
        ColumnSpec::Single(column)
    }
}

impl From<Vec<Column>> for ColumnSpec {
    fn from(columns: Vec<Column>) -> Self {
        ColumnSpec::Multiple(columns)
    }
}
