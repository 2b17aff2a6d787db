// Tool Locator Port
// Finds the inspection executable on the host

use std::path::PathBuf;

/// Default executable names, tried in order
pub const DEFAULT_TOOL_CANDIDATES: [&str; 2] = ["rocksdb_ldb", "ldb"];

/// Tool locator port
pub trait ToolLocator: Send + Sync {
    /// Return the path of the first candidate that resolves, or None.
    fn locate(&self, candidates: &[String]) -> Option<PathBuf>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;

    /// Resolves only the names it was given
    #[derive(Default)]
    pub struct MockToolLocator {
        installed: HashMap<String, PathBuf>,
    }

    impl MockToolLocator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_tool(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
            self.installed.insert(name.to_string(), path.into());
            self
        }
    }

    impl ToolLocator for MockToolLocator {
        fn locate(&self, candidates: &[String]) -> Option<PathBuf> {
            candidates
                .iter()
                .find_map(|name| self.installed.get(name).cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::MockToolLocator;
    use super::*;

    #[test]
    fn test_first_candidate_wins() {
        let locator = MockToolLocator::new()
            .with_tool("ldb", "/usr/bin/ldb")
            .with_tool("rocksdb_ldb", "/opt/homebrew/bin/rocksdb_ldb");
        let candidates: Vec<String> = DEFAULT_TOOL_CANDIDATES.iter().map(|s| s.to_string()).collect();

        assert_eq!(
            locator.locate(&candidates),
            Some(PathBuf::from("/opt/homebrew/bin/rocksdb_ldb"))
        );
    }

    #[test]
    fn test_fallback_and_missing() {
        let locator = MockToolLocator::new().with_tool("ldb", "/usr/bin/ldb");
        let candidates = vec!["rocksdb_ldb".to_string(), "ldb".to_string()];
        assert_eq!(locator.locate(&candidates), Some(PathBuf::from("/usr/bin/ldb")));

        assert_eq!(MockToolLocator::new().locate(&candidates), None);
    }
}
