// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid session state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("No pending deletion to confirm")]
    NothingToConfirm,
}

pub type Result<T> = std::result::Result<T, DomainError>;
