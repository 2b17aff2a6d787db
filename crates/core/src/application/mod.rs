// Application Layer - Use Cases

pub mod browser;
pub mod parser;
pub mod session;


// Re-exports
pub use browser::{Browser, ScanOutcome};
pub use parser::{parse_entries, parse_keys, parse_scan, KeyFilter, SEPARATOR};
pub use session::{BrowserSession, Form};
