mod common;
use common::{gltime, payload, record, sample_records, seed_store, setup_test_db};
use gltime::config::Config;
use gltime::context::Context;
use gltime::core::remote::{TOKEN_HEADER, fetch_events};
use gltime::core::{Dataset, Source};
use gltime::errors::AppError;
use httpmock::prelude::*;
use predicates::prelude::*;

/// The receiver serves the dataset text wrapped in a JSON string.
fn served(ds: &Dataset) -> String {
    serde_json::to_string(&ds.to_text().unwrap()).unwrap()
}

#[test]
fn test_remote_source_reads_receiver_dataset() {
    let ds = Dataset::from_records(sample_records());
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/events").header(TOKEN_HEADER, "secret");
        then.status(200)
            .header("content-type", "application/json")
            .body(served(&ds));
    });

    let loaded = Dataset::load(&[Source::Remote {
        url: format!("{}/", server.base_url()),
        token: Some("secret".into()),
    }])
    .unwrap();

    mock.assert_calls(1);
    assert_eq!(loaded, ds);
}

#[test]
fn test_plain_dataset_object_is_accepted() {
    let ds = Dataset::from_records(sample_records());
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/events");
        then.status(200)
            .header("content-type", "application/json")
            .body(ds.to_text().unwrap());
    });

    let text = fetch_events(&server.base_url(), None).unwrap();
    assert_eq!(Dataset::from_text(&text).unwrap(), ds);
}

#[test]
fn test_rejected_token_is_a_remote_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/events");
        then.status(401).body("bad token");
    });

    let res = Dataset::load(&[Source::Remote {
        url: server.base_url(),
        token: Some("wrong".into()),
    }]);
    match res {
        Err(AppError::Remote(msg)) => assert!(msg.contains("401")),
        other => panic!("expected a remote error, got {other:?}"),
    }
}

#[test]
fn test_remote_flag_needs_configured_url() {
    let ctx = Context::new(Config::default(), true);
    assert!(ctx.remote(None, false).unwrap().is_none());
    assert!(matches!(ctx.remote(None, true), Err(AppError::Config(_))));

    let mut cfg = Config::default();
    cfg.url = Some("http://receiver.invalid".into());
    cfg.token = Some("s3cret".into());
    let ctx = Context::new(cfg, true);
    match ctx.remote(None, true).unwrap() {
        Some(Source::Remote { url, token }) => {
            assert_eq!(url, "http://receiver.invalid");
            assert_eq!(token.as_deref(), Some("s3cret"));
        }
        other => panic!("expected a remote source, got {other:?}"),
    }
}

#[test]
fn test_cli_merges_store_and_receiver() {
    let db = setup_test_db("remote_cli_merge");
    seed_store(
        &db,
        &[("2024-01-10 09:00:00", payload("Alice", "team", "api", "Login", 0, 3600))],
    );

    let remote = Dataset::from_records(vec![record(
        "2024-02-01 09:00:00",
        "Bob",
        "team/web",
        2.0,
        "Navbar",
    )]);
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/events");
        then.status(200).body(served(&remote));
    });

    gltime()
        .args([
            "--db",
            &db,
            "totals",
            "--source",
            &db,
            "--url",
            &server.base_url(),
            "-l",
            "dev",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bob: 2h"))
        .stdout(predicate::str::contains("Alice: 1h"));

    mock.assert_calls(1);
}
