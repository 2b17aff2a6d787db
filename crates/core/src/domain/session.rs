// Session State Machine

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Where an interactive session is in its request/response cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingResult,
    Displaying,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "IDLE"),
            SessionState::AwaitingResult => write!(f, "AWAITING_RESULT"),
            SessionState::Displaying => write!(f, "DISPLAYING"),
        }
    }
}

impl SessionState {
    /// Idle/Displaying -> AwaitingResult (a run was triggered)
    pub fn begin(self) -> Result<Self> {
        match self {
            SessionState::Idle | SessionState::Displaying => Ok(SessionState::AwaitingResult),
            SessionState::AwaitingResult => Err(self.invalid("AWAITING_RESULT")),
        }
    }

    /// AwaitingResult -> Displaying (the runner returned, success or not)
    pub fn finish(self) -> Result<Self> {
        match self {
            SessionState::AwaitingResult => Ok(SessionState::Displaying),
            _ => Err(self.invalid("DISPLAYING")),
        }
    }

    /// Displaying -> Idle. Clearing an idle session is a no-op.
    pub fn clear(self) -> Result<Self> {
        match self {
            SessionState::Idle | SessionState::Displaying => Ok(SessionState::Idle),
            SessionState::AwaitingResult => Err(self.invalid("IDLE")),
        }
    }

    fn invalid(self, to: &str) -> DomainError {
        DomainError::InvalidStateTransition {
            from: self.to_string(),
            to: to.to_string(),
        }
    }
}
