//! Calendar-month buckets: left-closed, labelled by the first day of the month.

use crate::models::{Column, NormalizedRecord};
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: NaiveDate,
    pub amount: f64,
}

pub fn month_start(date: &NaiveDateTime) -> NaiveDate {
    let day = date.date();
    day - Days::new(u64::from(day.day0()))
}

/// Every month from `first` to `last` inclusive, gaps included.
pub fn month_span(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut m = first;

    while m <= last {
        out.push(m);
        m = match m.checked_add_months(Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    out
}

/// Sum `column` per month over the full span covered by `records`.
/// Months without records are present with `0.0`.
pub fn bucket_monthly<'a, I>(records: I, column: Column) -> Vec<MonthlyTotal>
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
{
    let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for r in records {
        *sums.entry(month_start(&r.date)).or_default() += r.amount(column).unwrap_or(0.0);
    }

    let (Some(first), Some(last)) = (sums.keys().next(), sums.keys().next_back()) else {
        return Vec::new();
    };

    month_span(*first, *last)
        .into_iter()
        .map(|month| MonthlyTotal {
            month,
            amount: sums.get(&month).copied().unwrap_or(0.0),
        })
        .collect()
}
