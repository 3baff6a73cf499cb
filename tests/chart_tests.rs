mod common;
use chrono::NaiveDate;
use common::{sample_records, temp_dir_for};
use gltime::core::monthly::MonthlyTotal;
use gltime::core::{Dataset, GroupKey};
use gltime::errors::AppError;
use gltime::models::Column;
use gltime::report::chart::{OTHER_LABEL, plot_file_name};
use gltime::report::pdf::PdfChart;
use gltime::report::{PlotOptions, StackedChart, plot, plot_overview};
use std::fs;

fn month(m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, 1).unwrap()
}

fn totals(values: &[(u32, f64)]) -> Vec<MonthlyTotal> {
    values
        .iter()
        .map(|&(m, amount)| MonthlyTotal {
            month: month(m),
            amount,
        })
        .collect()
}

#[test]
fn test_segments_stack_on_previous_groups() {
    let months = [month(1), month(2), month(3)];
    let groups = vec![
        ("A".to_string(), totals(&[(1, 2.0), (2, 0.0), (3, 1.0)])),
        ("B".to_string(), totals(&[(1, 1.0), (2, 0.0), (3, 3.0)])),
    ];

    let chart = StackedChart::build(&months, &groups, None).unwrap();
    assert_eq!(chart.series.len(), 2);

    let b = &chart.series[1];
    assert_eq!(b.label, "B");
    assert_eq!(b.segments[0].bottom, 2.0);
    assert_eq!(b.segments[2].bottom, 1.0);
    assert_eq!(b.segments[2].top(), 4.0);
    assert_eq!(chart.value_range(), (0.0, 4.0));
}

#[test]
fn test_groups_past_n_go_to_other() {
    let months = [month(1), month(2)];
    let groups = vec![
        ("A".to_string(), totals(&[(1, 5.0), (2, 1.0)])),
        ("B".to_string(), totals(&[(1, 2.0)])),
        ("C".to_string(), totals(&[(2, 4.0)])),
    ];

    let chart = StackedChart::build(&months, &groups, Some(1)).unwrap();
    let labels: Vec<&str> = chart.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["A", OTHER_LABEL]);

    let other = &chart.series[1];
    assert_eq!(other.segments[0].bottom, 5.0);
    assert_eq!(other.segments[0].height, 2.0);
    assert_eq!(other.segments[1].bottom, 1.0);
    assert_eq!(other.segments[1].height, 4.0);
}

#[test]
fn test_other_is_empty_when_everything_fits() {
    let months = [month(1)];
    let groups = vec![("A".to_string(), totals(&[(1, 5.0)]))];

    let chart = StackedChart::build(&months, &groups, Some(1)).unwrap();
    assert_eq!(chart.series.len(), 2);
    assert_eq!(chart.series[1].segments[0].height, 0.0);
}

#[test]
fn test_negative_segments_hang_below() {
    let months = [month(1)];
    let groups = vec![
        ("A".to_string(), totals(&[(1, 3.0)])),
        ("B".to_string(), totals(&[(1, -1.0)])),
    ];

    let chart = StackedChart::build(&months, &groups, None).unwrap();
    let b = chart.series[1].segments[0];
    assert_eq!(b.bottom, 3.0);
    assert_eq!(b.top(), 2.0);
}

#[test]
fn test_month_outside_axis_is_an_error() {
    let groups = vec![("A".to_string(), totals(&[(5, 1.0)]))];
    let res = StackedChart::build(&[month(1)], &groups, None);
    assert!(matches!(res, Err(AppError::Plot(_))));
}

#[test]
fn test_plot_file_names() {
    let one = [GroupKey::from("g/api")];
    let two = [GroupKey::from("a"), GroupKey::from("b")];
    assert_eq!(plot_file_name(Some("My Chart"), &two), "plot_My Chart.pdf");
    assert_eq!(plot_file_name(None, &one), "plot_g_api.pdf");
    assert_eq!(plot_file_name(None, &two), "plot_groups.pdf");
}

#[test]
fn test_pdf_bytes() {
    let chart = StackedChart::build(
        &[month(1), month(2)],
        &[("A".to_string(), totals(&[(1, 1.0), (2, 2.0)]))],
        None,
    )
    .unwrap()
    .with_title(Some("Ünïcode ✓"));

    let bytes = PdfChart::new().draw(&chart).finish();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_plot_writes_pdf() {
    let dir = temp_dir_for("chart_plot_writes_pdf");
    let ds = Dataset::from_records(sample_records());
    let groups = ds.group(Column::Dev).unwrap().reorder(Some(Column::Time), false).unwrap();

    let path = plot(
        &groups,
        &PlotOptions {
            n: Some(2),
            title: Some("Devs"),
            ..Default::default()
        },
        &dir,
    )
    .unwrap();

    assert_eq!(path, dir.join("plot_Devs.pdf"));
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_plot_selected_groups() {
    let dir = temp_dir_for("chart_plot_selected");
    let ds = Dataset::from_records(sample_records());
    let groups = ds.group(Column::Project).unwrap();
    let names = [GroupKey::from("g/web")];

    let path = plot(
        &groups,
        &PlotOptions {
            names: Some(&names[..]),
            ..Default::default()
        },
        &dir,
    )
    .unwrap();
    assert_eq!(path, dir.join("plot_g_web.pdf"));

    let unknown = [GroupKey::from("g/none")];
    let res = plot(
        &groups,
        &PlotOptions {
            names: Some(&unknown[..]),
            ..Default::default()
        },
        &dir,
    );
    assert!(matches!(res, Err(AppError::InvalidGroup(_))));
}

#[test]
fn test_plot_overview_chart_set() {
    let dir = temp_dir_for("chart_plot_overview");
    let ds = Dataset::from_records(sample_records());

    let written = plot_overview(&ds, Column::Time, 2, &dir).unwrap();

    // projects, two projects, two developers
    assert_eq!(written.len(), 5);
    assert!(dir.join("plot_Projects.pdf").exists());
    assert!(dir.join("plot_g_web.pdf").exists());
    assert!(dir.join("plot_Alice.pdf").exists());
    assert!(dir.join("plot_Carol.pdf").exists());
}
