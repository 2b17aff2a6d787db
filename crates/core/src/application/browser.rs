// Browser Service - one use case per tool operation

use crate::application::parser::{parse_entries, KeyFilter};
use crate::domain::operation::require_key;
use crate::domain::{DbPath, Entry, Key, ToolCommand};
use crate::error::{AppError, Result};
use crate::port::{CommandResult, CommandRunner, Invocation};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Substring of stderr that means the database directory is missing
const PATH_NOT_FOUND_MARKER: &str = "no such file or directory";

/// Keys (with values) produced by a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub entries: Vec<Entry>,
    pub filter: Option<String>,
}

impl ScanOutcome {
    pub fn keys(&self) -> Vec<Key> {
        self.entries.iter().map(|e| e.key.clone()).collect()
    }

    pub fn status_message(&self) -> String {
        format!("Found {} keys", self.entries.len())
    }
}

/// Runs tool commands against one executable and classifies their outcome
pub struct Browser {
    runner: Arc<dyn CommandRunner>,
    tool: Option<PathBuf>,
    candidates: Vec<String>,
}

impl Browser {
    /// `tool` is None when discovery found nothing; every run then fails
    /// with AppError::ToolUnavailable without spawning.
    pub fn new(runner: Arc<dyn CommandRunner>, tool: Option<PathBuf>, candidates: Vec<String>) -> Self {
        Self {
            runner,
            tool,
            candidates,
        }
    }

    pub fn tool(&self) -> Option<&Path> {
        self.tool.as_deref()
    }

    pub fn is_available(&self) -> bool {
        self.tool.is_some()
    }

    pub fn unavailable_error(&self) -> AppError {
        AppError::ToolUnavailable {
            candidates: self.candidates.clone(),
        }
    }

    /// Run a single command and classify the result
    ///
    /// # Errors
    /// - AppError::ToolUnavailable if no executable was found
    /// - AppError::Execution if the process could not be run
    /// - AppError::DatabaseNotFound if stderr reports a missing path
    /// - AppError::Invocation on non-zero exit or non-empty stderr
    pub async fn execute(&self, db: &DbPath, command: &ToolCommand) -> Result<CommandResult> {
        let program = self.tool.as_ref().ok_or_else(|| self.unavailable_error())?;
        let invocation = Invocation::new(program.clone(), command.args(db));

        debug!(
            operation = %command.operation(),
            db = %db,
            "Running inspection tool"
        );

        let result = self.runner.run(&invocation).await?;

        if result
            .stderr
            .to_lowercase()
            .contains(PATH_NOT_FOUND_MARKER)
        {
            debug!(db = %db, stderr = %result.stderr.trim_end(), "Database directory not accessible");
            return Err(AppError::DatabaseNotFound {
                path: db.as_str().to_string(),
            });
        }

        if !result.success() {
            debug!(
                operation = %command.operation(),
                exit_code = ?result.exit_code,
                "Inspection tool reported an error"
            );
            return Err(AppError::Invocation {
                exit_code: result.exit_code,
                stderr: result.stderr,
            });
        }

        Ok(result)
    }

    /// Enumerate entries, keeping only keys matching `pattern` when given.
    ///
    /// The pattern is validated before the tool runs.
    pub async fn scan(&self, db: &DbPath, pattern: Option<&str>) -> Result<ScanOutcome> {
        let filter = pattern.map(KeyFilter::new).transpose()?;
        let result = self.execute(db, &ToolCommand::Scan).await?;

        let mut entries = parse_entries(&result.stdout);
        if let Some(filter) = &filter {
            entries.retain(|e| filter.matches(&e.key));
        }

        info!(count = entries.len(), filtered = filter.is_some(), "Scan completed");

        Ok(ScanOutcome {
            entries,
            filter: filter.map(|f| f.as_str().to_string()),
        })
    }

    /// `get` with the regex flag: keys matching `pattern`, which must not be empty
    pub async fn get_matching(&self, db: &DbPath, pattern: &str) -> Result<ScanOutcome> {
        let pattern = require_key(pattern.to_string())?;
        self.scan(db, Some(&pattern)).await
    }

    /// Fetch the value stored under `key`
    pub async fn get(&self, db: &DbPath, key: &str) -> Result<String> {
        let command = ToolCommand::get(key)?;
        let result = self.execute(db, &command).await?;
        Ok(result.stdout.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Store `value` under `key`. Callers rescan themselves, so a failed
    /// rescan never hides a completed write.
    pub async fn put(&self, db: &DbPath, key: &str, value: &str) -> Result<()> {
        let command = ToolCommand::put(key, value)?;
        self.execute(db, &command).await?;
        info!(key = %key, "Put completed");
        Ok(())
    }

    pub async fn delete(&self, db: &DbPath, key: &str) -> Result<()> {
        let command = ToolCommand::delete(key)?;
        self.execute(db, &command).await?;
        info!(key = %key, "Delete completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::command_runner::mocks::{MockCommandRunner, MockReply};
    use crate::port::RunnerError;

    fn db() -> DbPath {
        DbPath::new("/tmp/db").unwrap()
    }

    fn browser(runner: &MockCommandRunner) -> Browser {
        Browser::new(
            Arc::new(runner.clone()),
            Some(PathBuf::from("/usr/bin/ldb")),
            vec!["ldb".to_string()],
        )
    }

    #[tokio::test]
    async fn test_scan_parses_keys() {
        let runner = MockCommandRunner::with_replies([MockReply::Stdout(
            "a ==> 1\nmalformed line\nb ==> 2\n".to_string(),
        )]);

        let outcome = browser(&runner).scan(&db(), None).await.unwrap();

        assert_eq!(outcome.keys(), vec!["a", "b"]);
        assert_eq!(outcome.status_message(), "Found 2 keys");
        assert_eq!(runner.recorded_args(), vec![vec!["--db=/tmp/db", "scan"]]);
        assert_eq!(runner.calls()[0].program, PathBuf::from("/usr/bin/ldb"));
    }

    #[tokio::test]
    async fn test_invalid_pattern_spawns_nothing() {
        let runner = MockCommandRunner::new();

        let err = browser(&runner).scan(&db(), Some("(")).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidPattern(_)));
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_put_validation_spawns_nothing() {
        let runner = MockCommandRunner::new();
        let browser = browser(&runner);

        assert!(browser.put(&db(), "", "v").await.unwrap_err().is_validation());
        assert!(browser.put(&db(), "k", "").await.unwrap_err().is_validation());
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_put_runs_single_write() {
        let runner = MockCommandRunner::with_replies([MockReply::Stdout(String::new())]);

        browser(&runner).put(&db(), "k", "v").await.unwrap();

        assert_eq!(runner.recorded_args(), vec![vec!["--db=/tmp/db", "put", "k", "v"]]);
    }

    #[tokio::test]
    async fn test_get_matching_filters_keys() {
        let runner = MockCommandRunner::with_replies([MockReply::Stdout(
            "apple ==> 1\nbanana ==> 2\navocado ==> 3\n".to_string(),
        )]);

        let outcome = browser(&runner).get_matching(&db(), "^a").await.unwrap();

        assert_eq!(outcome.keys(), vec!["apple", "avocado"]);
        assert_eq!(outcome.filter.as_deref(), Some("^a"));
    }

    #[tokio::test]
    async fn test_get_matching_empty_pattern_spawns_nothing() {
        let runner = MockCommandRunner::new();

        let err = browser(&runner).get_matching(&db(), "").await.unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("No key specified"));
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_get_trims_trailing_newline() {
        let runner = MockCommandRunner::with_replies([MockReply::Stdout("{\"n\":1}\n".to_string())]);
        let value = browser(&runner).get(&db(), "user:42").await.unwrap();
        assert_eq!(value, "{\"n\":1}");
    }

    #[tokio::test]
    async fn test_missing_path_is_distinguished() {
        let runner = MockCommandRunner::with_replies([MockReply::Fail {
            exit_code: 1,
            stderr: "IO error: No such file or directory: /tmp/db/CURRENT".to_string(),
        }]);

        let err = browser(&runner).scan(&db(), None).await.unwrap_err();

        assert!(matches!(err, AppError::DatabaseNotFound { ref path } if path == "/tmp/db"));
    }

    #[tokio::test]
    async fn test_stderr_is_surfaced_verbatim() {
        let runner = MockCommandRunner::with_replies([MockReply::Fail {
            exit_code: 1,
            stderr: "Failed: NotFound: ".to_string(),
        }]);

        let err = browser(&runner).get(&db(), "nope").await.unwrap_err();

        match err {
            AppError::Invocation { exit_code, stderr } => {
                assert_eq!(exit_code, Some(1));
                assert_eq!(stderr, "Failed: NotFound: ");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_tool_spawns_nothing() {
        let runner = MockCommandRunner::new();
        let browser = Browser::new(
            Arc::new(runner.clone()),
            None,
            vec!["rocksdb_ldb".to_string(), "ldb".to_string()],
        );

        assert!(!browser.is_available());
        let err = browser.scan(&db(), None).await.unwrap_err();
        assert!(matches!(err, AppError::ToolUnavailable { .. }));
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_spawn_failure_maps_to_execution_error() {
        let runner = MockCommandRunner::with_replies([MockReply::SpawnError("permission denied".to_string())]);

        let err = browser(&runner).delete(&db(), "k").await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Execution(RunnerError::SpawnFailed(_))
        ));
    }
}
