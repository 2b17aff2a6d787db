// Port Layer - Interfaces for external dependencies

pub mod command_runner;
pub mod time_provider; // For deterministic testing
pub mod tool_locator;

// Re-exports
pub use command_runner::{CommandResult, CommandRunner, Invocation, RunnerError};
pub use time_provider::TimeProvider;
pub use tool_locator::{ToolLocator, DEFAULT_TOOL_CANDIDATES};
