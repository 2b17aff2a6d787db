//! End-to-end tests of the interactive session against the fake ldb
#![cfg(unix)]

use ldbview_core::application::BrowserSession;
use ldbview_core::domain::{Operation, Request, SessionState};
use ldbview_integration_tests::{fake_browser, TestDb};

fn session_for(db: &TestDb) -> BrowserSession {
    let mut session = BrowserSession::new(fake_browser());
    session.set_db(&db.path_str()).unwrap();
    session
}

#[tokio::test]
async fn test_scan_select_delete_confirm() {
    let db = TestDb::with_lines("a ==> 1\nb ==> 2\nc ==> 3\n");
    let mut session = session_for(&db);

    session.run(Request::Scan { filter: None }).await.unwrap();
    assert_eq!(session.keys(), ["a", "b", "c"]);
    assert_eq!(session.status(), "Found 3 keys");

    session.set_mode(Operation::Delete);
    session.select("b ==> 2").await.unwrap();
    assert_eq!(session.value(), Some("2"));
    assert_eq!(session.pending_delete(), Some("b"));

    session.confirm_delete(true).await.unwrap();

    assert_eq!(session.keys(), ["a", "c"]);
    assert_eq!(session.state(), SessionState::Displaying);
    assert_eq!(db.contents(), "a ==> 1\nc ==> 3\n");
}

#[tokio::test]
async fn test_declined_delete_keeps_entry() {
    let db = TestDb::with_lines("a ==> 1\n");
    let mut session = session_for(&db);
    session.set_mode(Operation::Delete);
    session.set_key("a");

    session.run_form().await.unwrap();
    session.confirm_delete(false).await.unwrap();

    assert_eq!(db.contents(), "a ==> 1\n");
    assert_eq!(session.status(), "Kept key: a");
}

#[tokio::test]
async fn test_put_form_refreshes_key_list() {
    let db = TestDb::with_lines("a ==> 1\n");
    let mut session = session_for(&db);
    session.set_mode(Operation::Put);
    session.set_key("b");
    session.set_value("two words");

    session.run_form().await.unwrap();

    assert_eq!(session.keys(), ["a", "b"]);
    assert_eq!(session.status(), "Successfully put key: b");
}

#[tokio::test]
async fn test_get_regex_form() {
    let db = TestDb::with_lines("user:1 ==> a\nadmin:1 ==> b\nuser:2 ==> c\n");
    let mut session = session_for(&db);
    session.set_mode(Operation::Get);
    session.set_key("^user:");
    session.set_regex(true);

    session.run_form().await.unwrap();

    assert_eq!(session.keys(), ["user:1", "user:2"]);
}

#[tokio::test]
async fn test_failed_get_then_clear() {
    let db = TestDb::new();
    let mut session = session_for(&db);

    let err = session
        .run(Request::Get {
            key: "ghost".to_string(),
        })
        .await;

    assert!(err.is_err());
    assert_eq!(session.state(), SessionState::Displaying);
    assert!(session.status().starts_with("Error: Failed: NotFound"));
    assert!(session.keys().is_empty());

    session.clear().unwrap();
    assert_eq!(session.state(), SessionState::Idle);
}
