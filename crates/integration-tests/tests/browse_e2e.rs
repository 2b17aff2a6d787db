//! End-to-end tests: Browser -> SubprocessRunner -> fake ldb
#![cfg(unix)]

use ldbview_core::application::Browser;
use ldbview_core::domain::DbPath;
use ldbview_core::port::time_provider::SystemTimeProvider;
use ldbview_core::port::ToolLocator;
use ldbview_core::AppError;
use ldbview_infra_system::{PathToolLocator, SubprocessRunner};
use ldbview_integration_tests::{default_candidates, fake_browser, fake_tool_dir, TestDb};
use std::sync::Arc;

#[tokio::test]
async fn test_discovery_falls_back_to_second_candidate() {
    let browser = fake_browser();

    let tool = browser.tool().expect("fake ldb should be found");
    assert_eq!(tool, fake_tool_dir().join("ldb"));
}

#[tokio::test]
async fn test_scan_skips_non_data_lines() {
    let _ = fake_tool_dir();
    let db = TestDb::with_lines("a ==> 1\nmalformed line\nb ==> 2\n");

    let outcome = fake_browser().scan(&db.path(), None).await.unwrap();

    assert_eq!(outcome.keys(), vec!["a", "b"]);
    assert_eq!(outcome.entries[1].value, "2");
}

#[tokio::test]
async fn test_put_get_round_trip() {
    let browser = fake_browser();
    let db = TestDb::new();

    browser
        .put(&db.path(), "user:42", "{\"name\":\"x y\"}")
        .await
        .unwrap();
    let outcome = browser.scan(&db.path(), None).await.unwrap();
    assert_eq!(outcome.keys(), vec!["user:42"]);

    let value = browser.get(&db.path(), "user:42").await.unwrap();
    assert_eq!(value, "{\"name\":\"x y\"}");
}

#[tokio::test]
async fn test_put_overwrites_existing_key() {
    let browser = fake_browser();
    let db = TestDb::with_lines("k ==> old\n");

    browser.put(&db.path(), "k", "new").await.unwrap();

    assert_eq!(db.contents(), "k ==> new\n");
}

#[tokio::test]
async fn test_regex_filter_keeps_order() {
    let browser = fake_browser();
    let db = TestDb::with_lines("apple ==> 1\nbanana ==> 2\navocado ==> 3\n");

    let outcome = browser.scan(&db.path(), Some("^a")).await.unwrap();

    assert_eq!(outcome.keys(), vec!["apple", "avocado"]);
}

#[tokio::test]
async fn test_regex_get_lists_matching_keys() {
    let browser = fake_browser();
    let db = TestDb::with_lines("user:1 ==> a\norder:7 ==> b\nuser:2 ==> c\n");

    let outcome = browser.get_matching(&db.path(), "^user:").await.unwrap();
    assert_eq!(outcome.keys(), vec!["user:1", "user:2"]);

    let err = browser.get_matching(&db.path(), "").await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_missing_key_surfaces_stderr() {
    let browser = fake_browser();
    let db = TestDb::new();

    let err = browser.get(&db.path(), "ghost").await.unwrap_err();

    match err {
        AppError::Invocation { exit_code, stderr } => {
            assert_eq!(exit_code, Some(1));
            assert!(stderr.starts_with("Failed: NotFound"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_database_directory() {
    let browser = fake_browser();
    let db = DbPath::new("/nonexistent/ldbview/db").unwrap();

    let err = browser.scan(&db, None).await.unwrap_err();

    assert!(matches!(err, AppError::DatabaseNotFound { ref path } if path == "/nonexistent/ldbview/db"));
    assert!(err.to_string().contains("Could not access the database directory"));
}

#[tokio::test]
async fn test_delete_removes_entry() {
    let browser = fake_browser();
    let db = TestDb::with_lines("a ==> 1\nb ==> 2\n");

    browser.delete(&db.path(), "a").await.unwrap();

    assert_eq!(db.contents(), "b ==> 2\n");
}

#[tokio::test]
async fn test_no_tool_means_no_run() {
    let empty = tempfile::TempDir::new().unwrap();
    let locator = PathToolLocator::with_path(empty.path().as_os_str(), vec![]);
    let candidates = default_candidates();
    let browser = Browser::new(
        Arc::new(SubprocessRunner::new(Arc::new(SystemTimeProvider))),
        locator.locate(&candidates),
        candidates,
    );
    let db = TestDb::new();

    let err = browser.put(&db.path(), "k", "v").await.unwrap_err();

    assert!(matches!(err, AppError::ToolUnavailable { .. }));
    assert_eq!(db.contents(), "");
}
