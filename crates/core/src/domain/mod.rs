// Domain Layer - Pure model of the browse workflow

pub mod entry;
pub mod error;
pub mod operation;
pub mod session;

// Re-exports
pub use entry::{Entry, Key};
pub use error::DomainError;
pub use operation::{DbPath, Operation, Request, ToolCommand};
pub use session::SessionState;
