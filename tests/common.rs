#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDateTime;
use gltime::db::initialize::init_db;
use gltime::db::pool::DbPool;
use gltime::db::queries::insert_event;
use gltime::models::NormalizedRecord;
use serde_json::json;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn gltime() -> Command {
    cargo_bin_cmd!("gltime")
}

/// Create a unique test store path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_gltime.db", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh empty directory inside tempdir
pub fn temp_dir_for(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_gltime_dir", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

pub fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid test timestamp")
}

/// A GitLab issue webhook body carrying a time-tracking change
pub fn payload(
    user: &str,
    namespace: &str,
    project: &str,
    issue: &str,
    previous: i64,
    current: i64,
) -> String {
    json!({
        "object_kind": "issue",
        "user": { "id": 7, "name": user },
        "project": { "namespace": namespace, "name": project },
        "object_attributes": { "title": issue },
        "changes": {
            "total_time_spent": { "previous": previous, "current": current }
        }
    })
    .to_string()
}

/// A webhook body without a time-tracking change
pub fn plain_payload(user: &str) -> String {
    json!({
        "object_kind": "issue",
        "user": { "id": 7, "name": user },
        "project": { "namespace": "g", "name": "p" },
        "object_attributes": { "title": "T" },
        "changes": { "labels": { "previous": [], "current": [] } }
    })
    .to_string()
}

/// Write events straight into a store through the library DB API
pub fn seed_store(db_path: &str, events: &[(&str, String)]) {
    let pool = DbPool::new(db_path).expect("open store");
    init_db(&pool.conn).expect("init store");
    for (time, body) in events {
        insert_event(&pool.conn, &at(time), 7, body).expect("insert event");
    }
}

pub fn record(date: &str, dev: &str, project: &str, hours: f64, issue: &str) -> NormalizedRecord {
    NormalizedRecord::new(at(date), dev, project, hours, issue)
}

/// Three developers, two projects, three months (February has no records)
pub fn sample_records() -> Vec<NormalizedRecord> {
    vec![
        record("2024-01-05 09:00:00", "Alice", "g/api", 2.0, "Login"),
        record("2024-01-06 09:00:00", "Bob", "g/api", 1.5, "Login"),
        record("2024-01-20 10:00:00", "Alice", "g/web", 3.0, "Navbar"),
        record("2024-03-02 11:00:00", "Carol", "g/web", 4.0, "Footer"),
        record("2024-03-03 12:00:00", "Alice", "g/api", -0.5, "Login"),
    ]
}
