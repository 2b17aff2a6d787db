// Command Runner Port
// Abstraction for running the external inspection tool once, synchronously

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Program plus arguments for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

/// Captured outcome of a finished process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// None when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: i64,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && self.stderr.trim().is_empty()
    }
}

/// Runner errors (the process could not be run at all)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunnerError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Command Runner trait
///
/// Implementations:
/// - SubprocessRunner: spawns the tool as a child process
/// - MockCommandRunner: scripted responses for tests
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion and capture everything the process printed.
    ///
    /// A non-zero exit is NOT an error at this level; callers classify it.
    ///
    /// # Errors
    /// - RunnerError::SpawnFailed if the program cannot be started
    /// - RunnerError::IoError if waiting on the process fails
    async fn run(&self, invocation: &Invocation) -> Result<CommandResult, RunnerError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Scripted reply for one run
    #[derive(Debug, Clone)]
    pub enum MockReply {
        /// Exit 0 with this stdout
        Stdout(String),
        /// Exit with code and stderr
        Fail { exit_code: i32, stderr: String },
        /// The program could not be spawned
        SpawnError(String),
    }

    /// Mock Command Runner for testing.
    /// Replies are consumed in order; once exhausted every run succeeds with empty output.
    #[derive(Clone, Default)]
    pub struct MockCommandRunner {
        replies: Arc<Mutex<VecDeque<MockReply>>>,
        calls: Arc<Mutex<Vec<Invocation>>>,
    }

    impl MockCommandRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
            let runner = Self::new();
            runner.replies.lock().unwrap().extend(replies);
            runner
        }

        pub fn push(&self, reply: MockReply) {
            self.replies.lock().unwrap().push_back(reply);
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().unwrap().clone()
        }

        /// Arguments of every recorded run, in order
        pub fn recorded_args(&self) -> Vec<Vec<String>> {
            self.calls().into_iter().map(|c| c.args).collect()
        }
    }

    #[async_trait]
    impl CommandRunner for MockCommandRunner {
        async fn run(&self, invocation: &Invocation) -> Result<CommandResult, RunnerError> {
            self.calls.lock().unwrap().push(invocation.clone());

            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| MockReply::Stdout(String::new()));

            match reply {
                MockReply::Stdout(stdout) => Ok(CommandResult {
                    exit_code: Some(0),
                    stdout,
                    stderr: String::new(),
                    duration_ms: 1,
                }),
                MockReply::Fail { exit_code, stderr } => Ok(CommandResult {
                    exit_code: Some(exit_code),
                    stdout: String::new(),
                    stderr,
                    duration_ms: 1,
                }),
                MockReply::SpawnError(msg) => Err(RunnerError::SpawnFailed(msg)),
            }
        }
    }
}
