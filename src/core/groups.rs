//! Partitioning of a dataset by categorical column values.

use crate::core::dataset::Dataset;
use crate::core::monthly::{MonthlyTotal, bucket_monthly};
use crate::errors::{AppError, AppResult};
use crate::models::{Column, ColumnSpec, NormalizedRecord};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

/// Name of a group: the values of the grouping columns, in column order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey(Vec<String>);

impl GroupKey {
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// Parse a group name typed by a user for a grouping of `width`
    /// columns: the value as is for one column, else comma-separated values.
    pub fn parse(text: &str, width: usize) -> AppResult<Self> {
        if width <= 1 {
            return Ok(Self::from(text));
        }

        let values: Vec<String> = text.split(',').map(str::to_string).collect();
        if values.len() != width {
            return Err(AppError::InvalidGroup(format!(
                "'{text}' needs {width} comma-separated values"
            )));
        }
        Ok(Self(values))
    }

    fn of(record: &NormalizedRecord, columns: &[Column]) -> Self {
        Self(
            columns
                .iter()
                .map(|c| record.text(*c).unwrap_or_default().to_string())
                .collect(),
        )
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [single] => f.write_str(single),
            many => write!(f, "({})", many.join(", ")),
        }
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl From<String> for GroupKey {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

/// Groups of one dataset. The partition is computed once; only the order of
/// the names changes afterwards.
#[derive(Debug, Clone)]
pub struct Groups<'a> {
    dataset: &'a Dataset,
    columns: ColumnSpec,
    partitions: BTreeMap<GroupKey, Vec<usize>>,
    names: Vec<GroupKey>,
}

impl<'a> Groups<'a> {
    pub fn new(dataset: &'a Dataset, columns: ColumnSpec) -> AppResult<Self> {
        columns.validate()?;

        let mut partitions: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
        for (i, r) in dataset.records().iter().enumerate() {
            partitions
                .entry(GroupKey::of(r, columns.columns()))
                .or_default()
                .push(i);
        }

        let names = partitions.keys().cloned().collect();

        Ok(Self {
            dataset,
            columns,
            partitions,
            names,
        })
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn columns(&self) -> &[Column] {
        self.columns.columns()
    }

    /// Group names in the current order.
    pub fn names(&self) -> &[GroupKey] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn indices(&self, key: &GroupKey) -> AppResult<&[usize]> {
        self.partitions
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| AppError::InvalidGroup(key.to_string()))
    }

    fn members(
        &self,
        key: &GroupKey,
    ) -> AppResult<impl Iterator<Item = &'a NormalizedRecord> + '_> {
        let records = self.dataset.records();
        Ok(self.indices(key)?.iter().map(move |&i| &records[i]))
    }

    /// The records of one group as a dataset of their own.
    pub fn get_by_name(&self, key: &GroupKey) -> AppResult<Dataset> {
        Ok(Dataset::from_records(self.members(key)?.cloned().collect()))
    }

    pub fn sum(&self, key: &GroupKey, column: Column) -> AppResult<f64> {
        let column = column.ensure_numeric()?;
        Ok(self.members(key)?.filter_map(|r| r.amount(column)).sum())
    }

    /// Order groups by the sum of `column` (descending unless `ascending`),
    /// or restore the default key order when `column` is `None`.
    /// Ties keep the default order.
    pub fn reorder(mut self, column: Option<Column>, ascending: bool) -> AppResult<Self> {
        let mut names: Vec<GroupKey> = self.partitions.keys().cloned().collect();

        if let Some(column) = column {
            let mut sums = Vec::with_capacity(names.len());
            for name in names {
                let total = self.sum(&name, column)?;
                sums.push((name, total));
            }

            sums.sort_by(|(_, a), (_, b)| {
                if ascending {
                    a.total_cmp(b)
                } else {
                    b.total_cmp(a)
                }
            });
            names = sums.into_iter().map(|(name, _)| name).collect();
        }

        self.names = names;
        Ok(self)
    }

    /// Re-sort the current names alphabetically, ignoring case.
    pub fn sort_by_name(mut self) -> Self {
        self.names.sort_by_cached_key(|name| name.to_string().to_lowercase());
        self
    }

    /// Monthly sums of `column` for one group, over the group's own months.
    pub fn time_series(&self, key: &GroupKey, column: Column) -> AppResult<Vec<MonthlyTotal>> {
        let column = column.ensure_numeric()?;
        Ok(bucket_monthly(self.members(key)?, column))
    }

    /// Sub-datasets in the current order. Each call starts over.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, Dataset)> + '_ {
        self.names.iter().map(move |name| {
            let records = self
                .partitions
                .get(name)
                .map(|idx| idx.iter().map(|&i| self.dataset.records()[i].clone()).collect())
                .unwrap_or_default();
            (name, Dataset::from_records(records))
        })
    }

    /// One line per group: position, record count, name.
    pub fn list(&self, out: &mut impl Write) -> AppResult<()> {
        for (i, name) in self.names.iter().enumerate() {
            writeln!(out, "{:04}[{:04}]: {}", i, self.indices(name)?.len(), name)?;
        }
        Ok(())
    }
}
