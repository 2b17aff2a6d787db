// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(String),

    #[error("Could not find any of [{}] on PATH. Install the RocksDB tools (e.g. `brew install rocksdb`) or pass --tool", candidates.join(", "))]
    ToolUnavailable { candidates: Vec<String> },

    #[error("Could not access the database directory '{path}'. Please check if the path is correct and accessible")]
    DatabaseNotFound { path: String },

    #[error("{}", invocation_message(*exit_code, stderr))]
    Invocation {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Execution error: {0}")]
    Execution(#[from] crate::port::RunnerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Rejected before any process was spawned
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::InvalidPattern(_)
                | AppError::Domain(crate::domain::DomainError::ValidationError(_))
        )
    }
}

fn invocation_message(exit_code: Option<i32>, stderr: &str) -> String {
    let stderr = stderr.trim_end();
    match (exit_code, stderr.is_empty()) {
        (_, false) => format!("Error: {}", stderr),
        (Some(code), true) => format!("Error: tool exited with status {}", code),
        (None, true) => "Error: tool terminated by signal".to_string(),
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::InvalidPattern(err.to_string())
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
