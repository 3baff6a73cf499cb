mod common;
use common::{record, sample_records};
use gltime::core::{Dataset, GroupKey};
use gltime::errors::AppError;
use gltime::models::{Column, ColumnSpec};

fn names(keys: &[GroupKey]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

#[test]
fn test_default_order_is_by_key() {
    let ds = Dataset::from_records(sample_records());
    let groups = ds.group(Column::Dev).unwrap();
    assert_eq!(names(groups.names()), ["Alice", "Bob", "Carol"]);
    assert_eq!(groups.len(), 3);
}

#[test]
fn test_reorder_by_time() {
    let ds = Dataset::from_records(sample_records());

    // Alice 4.5h, Bob 1.5h, Carol 4.0h
    let desc = ds.group(Column::Dev).unwrap().reorder(Some(Column::Time), false).unwrap();
    assert_eq!(names(desc.names()), ["Alice", "Carol", "Bob"]);

    let asc = desc.reorder(Some(Column::Time), true).unwrap();
    assert_eq!(names(asc.names()), ["Bob", "Carol", "Alice"]);

    let restored = asc.reorder(None, false).unwrap();
    assert_eq!(names(restored.names()), ["Alice", "Bob", "Carol"]);
}

#[test]
fn test_reorder_ties_keep_key_order() {
    let ds = Dataset::from_records(vec![
        record("2024-01-01 10:00:00", "Zed", "g/p", 1.0, "x"),
        record("2024-01-02 10:00:00", "Amy", "g/p", 1.0, "x"),
        record("2024-01-03 10:00:00", "Max", "g/p", 2.0, "x"),
    ]);
    let groups = ds.group(Column::Dev).unwrap().reorder(Some(Column::Time), false).unwrap();
    assert_eq!(names(groups.names()), ["Max", "Amy", "Zed"]);
}

#[test]
fn test_reorder_by_categorical_column_fails() {
    let ds = Dataset::from_records(sample_records());
    let res = ds.group(Column::Dev).unwrap().reorder(Some(Column::Issue), false);
    assert!(matches!(res, Err(AppError::InvalidColumns(_))));
}

#[test]
fn test_sort_by_name_ignores_case() {
    let ds = Dataset::from_records(vec![
        record("2024-01-01 10:00:00", "bob", "g/p", 5.0, "x"),
        record("2024-01-02 10:00:00", "Alice", "g/p", 1.0, "x"),
        record("2024-01-03 10:00:00", "Carl", "g/p", 3.0, "x"),
    ]);
    let groups = ds
        .group(Column::Dev)
        .unwrap()
        .reorder(Some(Column::Time), false)
        .unwrap()
        .sort_by_name();
    assert_eq!(names(groups.names()), ["Alice", "bob", "Carl"]);
}

#[test]
fn test_partition_covers_every_record_once() {
    let ds = Dataset::from_records(sample_records());
    let groups = ds.group(Column::Project).unwrap();

    let mut count = 0;
    let mut total = 0.0;
    for (_, sub) in groups.iter() {
        count += sub.count();
        total += sub.total(Column::Time).unwrap();
    }
    assert_eq!(count, ds.count());
    assert_eq!(total, ds.total(Column::Time).unwrap());
}

#[test]
fn test_iteration_restarts() {
    let ds = Dataset::from_records(sample_records());
    let groups = ds.group(Column::Dev).unwrap();
    let first: Vec<String> = groups.iter().map(|(k, _)| k.to_string()).collect();
    let second: Vec<String> = groups.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(first, second);
}

#[test]
fn test_get_by_name() {
    let ds = Dataset::from_records(sample_records());
    let groups = ds.group(Column::Dev).unwrap();

    let alice = groups.get_by_name(&GroupKey::from("Alice")).unwrap();
    assert_eq!(alice.count(), 3);
    assert_eq!(groups.sum(&GroupKey::from("Alice"), Column::Time).unwrap(), 4.5);

    assert!(matches!(
        groups.get_by_name(&GroupKey::from("Nobody")),
        Err(AppError::InvalidGroup(_))
    ));
}

#[test]
fn test_multi_column_keys() {
    let ds = Dataset::from_records(sample_records());
    let spec = ColumnSpec::parse(&["dev", "project"]).unwrap();
    let groups = ds.group(spec).unwrap();

    assert_eq!(groups.len(), 4);
    let key = GroupKey::new(vec!["Alice".into(), "g/api".into()]);
    assert_eq!(key.to_string(), "(Alice, g/api)");
    assert_eq!(groups.get_by_name(&key).unwrap().count(), 2);
}

#[test]
fn test_grouping_validation() {
    let ds = Dataset::from_records(sample_records());
    assert!(matches!(ds.group(Column::Time), Err(AppError::InvalidColumns(_))));
    assert!(matches!(
        ds.group(ColumnSpec::Multiple(Vec::new())),
        Err(AppError::InvalidColumns(_))
    ));
    assert!(matches!(
        ColumnSpec::parse(&["dev", "colour"]),
        Err(AppError::InvalidColumns(_))
    ));
}

#[test]
fn test_time_series_uses_group_months() {
    let ds = Dataset::from_records(sample_records());
    let groups = ds.group(Column::Dev).unwrap();

    let alice = groups.time_series(&GroupKey::from("Alice"), Column::Time).unwrap();
    let amounts: Vec<f64> = alice.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![5.0, 0.0, -0.5]);

    let bob = groups.time_series(&GroupKey::from("Bob"), Column::Time).unwrap();
    assert_eq!(bob.len(), 1);
}

#[test]
fn test_list_lines() {
    let ds = Dataset::from_records(sample_records());
    let groups = ds.group(Column::Dev).unwrap();
    let mut out = Vec::new();
    groups.list(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, "0000[0003]: Alice\n0001[0001]: Bob\n0002[0001]: Carol\n");
}

#[test]
fn test_empty_dataset_has_no_groups() {
    let ds = Dataset::empty();
    let groups = ds.group(Column::Dev).unwrap();
    assert!(groups.is_empty());
}

#[test]
fn test_group_names_typed_for_several_columns() {
    let ds = Dataset::from_records(sample_records());
    let groups = ds.group(ColumnSpec::parse(&["project", "dev"]).unwrap()).unwrap();

    let key = GroupKey::parse("g/api,Alice", groups.columns().len()).unwrap();
    assert_eq!(groups.get_by_name(&key).unwrap().count(), 2);

    // one column: commas belong to the value
    assert_eq!(GroupKey::parse("a,b", 1).unwrap().values(), ["a,b"]);

    assert!(matches!(
        GroupKey::parse("g/api", 2),
        Err(AppError::InvalidGroup(_))
    ));
}
