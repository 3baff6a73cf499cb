use crate::errors::{AppError, AppResult};
use crate::models::{Column, NormalizedRecord};
use std::collections::BTreeMap;

/// Exact-match predicates combined with AND, one value per column.
///
/// Values are compared as plain strings, so quotes or operators inside a
/// value never need escaping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    predicates: BTreeMap<Column, String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Selection::insert`].
    pub fn with(mut self, column: Column, value: impl Into<String>) -> AppResult<Self> {
        self.insert(column, value)?;
        Ok(self)
    }

    /// Add (or replace) the predicate for `column`.
    pub fn insert(&mut self, column: Column, value: impl Into<String>) -> AppResult<()> {
        if !column.is_categorical() {
            return Err(AppError::InvalidColumns(format!(
                "cannot select on non-categorical column '{column}'"
            )));
        }
        self.predicates.insert(column, value.into());
        Ok(())
    }

    /// Parse CLI filters of the form `column=value`.
    pub fn parse<S: AsRef<str>>(filters: &[S]) -> AppResult<Self> {
        let mut sel = Self::new();
        for f in filters {
            let f = f.as_ref();
            let (name, value) = f.split_once('=').ok_or_else(|| {
                AppError::InvalidColumns(format!("filter '{f}' is not in the form column=value"))
            })?;
            sel.insert(name.parse()?, value)?;
        }
        Ok(sel)
    }

    pub fn matches(&self, record: &NormalizedRecord) -> bool {
        self.predicates
            .iter()
            .all(|(col, value)| record.text(*col) == Some(value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Column, &str)> {
        self.predicates.iter().map(|(c, v)| (*c, v.as_str()))
    }
}
