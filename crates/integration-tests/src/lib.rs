//! Shared fixtures: a POSIX shell stand-in for `ldb` and throwaway databases.
//!
//! The fake keeps entries in `<db>/entries`, one `key ==> value` per line,
//! and mimics the real tool's argument order and error text.

use ldbview_core::application::Browser;
use ldbview_core::domain::DbPath;
use ldbview_core::port::time_provider::SystemTimeProvider;
use ldbview_core::port::{ToolLocator, DEFAULT_TOOL_CANDIDATES};
use ldbview_infra_system::{PathToolLocator, SubprocessRunner};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tempfile::TempDir;

const FAKE_LDB: &str = r#"#!/bin/sh
db="${1#--db=}"
shift
if [ ! -d "$db" ]; then
    echo "Failed: IO error: No such file or directory: While opening a file for sequentially reading: $db/CURRENT" >&2
    exit 1
fi
store="$db/entries"
touch "$store"
case "$1" in
    scan)
        cat "$store"
        ;;
    get)
        found=$(awk -v k="$2" 'index($0, k " ==> ") == 1 { print substr($0, length(k) + 6); f = 1; exit } END { exit !f }' "$store") || {
            echo "Failed: NotFound: " >&2
            exit 1
        }
        printf '%s\n' "$found"
        ;;
    put)
        awk -v k="$2" 'index($0, k " ==> ") != 1' "$store" > "$store.tmp"
        printf '%s ==> %s\n' "$2" "$3" >> "$store.tmp"
        mv "$store.tmp" "$store"
        echo "OK"
        ;;
    delete)
        awk -v k="$2" 'index($0, k " ==> ") != 1' "$store" > "$store.tmp"
        mv "$store.tmp" "$store"
        echo "OK"
        ;;
    *)
        echo "Failed: unknown command: $1" >&2
        exit 1
        ;;
esac
"#;

/// Directory holding the fake `ldb`, installed once per test binary.
///
/// Every test goes through this before spawning anything, so the script is
/// closed for writing before the first exec.
pub fn fake_tool_dir() -> &'static Path {
    static DIR: OnceLock<PathBuf> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = std::env::temp_dir().join(format!("ldbview-fake-ldb-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create fake tool dir");
        let script = dir.join("ldb");
        fs::write(&script, FAKE_LDB).expect("write fake ldb");
        make_executable(&script);
        dir
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod fake ldb");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

pub fn default_candidates() -> Vec<String> {
    DEFAULT_TOOL_CANDIDATES.iter().map(|s| s.to_string()).collect()
}

/// Browser wired to the real subprocess runner and the fake tool
pub fn fake_browser() -> Arc<Browser> {
    let locator = PathToolLocator::with_path(fake_tool_dir().as_os_str(), vec![]);
    let candidates = default_candidates();
    let tool = locator.locate(&candidates);
    Arc::new(Browser::new(
        Arc::new(SubprocessRunner::new(Arc::new(SystemTimeProvider))),
        tool,
        candidates,
    ))
}

/// Throwaway database directory
pub struct TestDb {
    dir: TempDir,
}

impl TestDb {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create db dir"),
        }
    }

    /// Database pre-filled with raw store lines
    pub fn with_lines(lines: &str) -> Self {
        let db = Self::new();
        fs::write(db.dir.path().join("entries"), lines).expect("seed entries");
        db
    }

    pub fn path(&self) -> DbPath {
        DbPath::new(self.dir.path().to_string_lossy()).expect("non-empty path")
    }

    pub fn path_str(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }

    /// Raw store contents as the fake tool left them
    pub fn contents(&self) -> String {
        fs::read_to_string(self.dir.path().join("entries")).unwrap_or_default()
    }
}

impl Default for TestDb {
    fn default() -> Self {
        Self::new()
    }
}
