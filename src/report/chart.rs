//! Monthly stacked-bar charts of grouped time.
//!
//! The stacking is computed here, independently of the drawing backend:
//! for every month the i-th drawn group sits on the sum of the groups drawn
//! before it, and groups past the top `n` only feed the "Other" bar, which
//! sits on top of everything drawn.

use crate::core::monthly::MonthlyTotal;
use crate::core::{Dataset, GroupKey, Groups, Selection};
use crate::errors::{AppError, AppResult};
use crate::models::Column;
use crate::report::pdf::PdfChart;
use crate::ui::messages::info;
use crate::utils::path::file_safe;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub const OTHER_LABEL: &str = "Other";
pub const X_LABEL: &str = "Date";
pub const Y_LABEL: &str = "Monthly Total [h]";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub month_index: usize,
    pub bottom: f64,
    pub height: f64,
}

impl Segment {
    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackedChart {
    pub title: Option<String>,
    pub months: Vec<NaiveDate>,
    pub series: Vec<Series>,
}

impl StackedChart {
    /// Stack `groups` (already in drawing order) over the month axis.
    pub fn build(
        months: &[NaiveDate],
        groups: &[(String, Vec<MonthlyTotal>)],
        n: Option<usize>,
    ) -> AppResult<Self> {
        let mut bottom_master = vec![0.0; months.len()];
        let mut sum_other = vec![0.0; months.len()];
        let mut series = Vec::new();

        let index_of = |month: NaiveDate| -> AppResult<usize> {
            months
                .binary_search(&month)
                .map_err(|_| AppError::Plot(format!("month {month} is outside the chart axis")))
        };

        for (i, (label, totals)) in groups.iter().enumerate() {
            if n.is_none_or(|n| i < n) {
                let mut segments = Vec::with_capacity(totals.len());
                for t in totals {
                    let idx = index_of(t.month)?;
                    segments.push(Segment {
                        month_index: idx,
                        bottom: bottom_master[idx],
                        height: t.amount,
                    });
                }
                for s in &segments {
                    bottom_master[s.month_index] += s.height;
                }
                series.push(Series {
                    label: label.clone(),
                    segments,
                });
            } else {
                for t in totals {
                    sum_other[index_of(t.month)?] += t.amount;
                }
            }
        }

        if n.is_some() {
            series.push(Series {
                label: OTHER_LABEL.to_string(),
                segments: (0..months.len())
                    .map(|idx| Segment {
                        month_index: idx,
                        bottom: bottom_master[idx],
                        height: sum_other[idx],
                    })
                    .collect(),
            });
        }

        Ok(Self {
            title: None,
            months: months.to_vec(),
            series,
        })
    }

    pub fn with_title(mut self, title: Option<&str>) -> Self {
        self.title = title.map(str::to_string);
        self
    }

    /// Lowest and highest value reached by any segment, zero included.
    pub fn value_range(&self) -> (f64, f64) {
        self.series
            .iter()
            .flat_map(|s| &s.segments)
            .fold((0.0_f64, 0.0_f64), |(lo, hi), seg| {
                (
                    lo.min(seg.bottom).min(seg.top()),
                    hi.max(seg.bottom).max(seg.top()),
                )
            })
    }
}

/// What to draw and how.
#[derive(Debug, Clone)]
pub struct PlotOptions<'a> {
    /// Groups to draw, in order; `None` draws every group in current order
    pub names: Option<&'a [GroupKey]>,
    pub column: Column,
    /// Draw the first `n` groups and sum the rest into "Other"
    pub n: Option<usize>,
    pub title: Option<&'a str>,
}

impl Default for PlotOptions<'_> {
    fn default() -> Self {
        Self {
            names: None,
            column: Column::Time,
            n: None,
            title: None,
        }
    }
}

/// `plot_{title}.pdf`, `plot_{group}.pdf` for one group, else `plot_groups.pdf`.
pub fn plot_file_name(title: Option<&str>, names: &[GroupKey]) -> String {
    let stem = match (title, names) {
        (Some(t), _) => t.to_string(),
        (None, [single]) => single.to_string(),
        _ => "groups".to_string(),
    };
    format!("plot_{}.pdf", file_safe(&stem))
}

/// Draw one stacked chart of `groups` into `out_dir`. Returns the file written.
pub fn plot(groups: &Groups<'_>, opts: &PlotOptions<'_>, out_dir: &Path) -> AppResult<PathBuf> {
    let names: &[GroupKey] = opts.names.unwrap_or(groups.names());

    let mut series = Vec::with_capacity(names.len());
    for name in names {
        series.push((name.to_string(), groups.time_series(name, opts.column)?));
    }

    let chart = StackedChart::build(&groups.dataset().dates(), &series, opts.n)?
        .with_title(opts.title);

    let path = out_dir.join(plot_file_name(opts.title, names));
    PdfChart::new().draw(&chart).save(&path)?;

    info(format!("Figure written to file: {}", path.display()));
    Ok(path)
}

/// The standard chart set: top projects; per top project its top
/// developers; per top developer their top projects.
pub fn plot_overview(
    ds: &Dataset,
    column: Column,
    n: usize,
    out_dir: &Path,
) -> AppResult<Vec<PathBuf>> {
    let mut written = Vec::new();

    let projects = ds.group(Column::Project)?.reorder(Some(column), false)?;
    let n_projects = n.min(projects.len());
    written.push(plot(
        &projects,
        &PlotOptions {
            column,
            n: Some(n_projects),
            title: Some("Projects"),
            ..Default::default()
        },
        out_dir,
    )?);

    for project in &projects.names()[..n_projects] {
        written.push(plot_top(ds, Column::Project, project, Column::Dev, column, n, out_dir)?);
    }

    let devs = ds.group(Column::Dev)?.reorder(Some(column), false)?;
    let n_devs = n.min(devs.len());
    for dev in &devs.names()[..n_devs] {
        written.push(plot_top(ds, Column::Dev, dev, Column::Project, column, n, out_dir)?);
    }

    Ok(written)
}

/// Chart of the top `n` `by` groups inside one `within` group, titled by it.
fn plot_top(
    ds: &Dataset,
    within: Column,
    key: &GroupKey,
    by: Column,
    column: Column,
    n: usize,
    out_dir: &Path,
) -> AppResult<PathBuf> {
    let name = key.to_string();
    let sub = ds.subselect(&Selection::new().with(within, name.as_str())?);
    let groups = sub.group(by)?.reorder(Some(column), false)?;

    plot(
        &groups,
        &PlotOptions {
            column,
            n: Some(n.min(groups.len())),
            title: Some(&name),
            ..Default::default()
        },
        out_dir,
    )
}
