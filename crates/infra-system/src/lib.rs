// ldbview Infrastructure - System Adapters
// Implements: CommandRunner, ToolLocator

pub mod path_locator;
pub mod subprocess_runner;

pub use path_locator::PathToolLocator;
pub use subprocess_runner::SubprocessRunner;
