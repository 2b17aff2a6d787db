// Tool locator implementation
// Searches PATH plus extra directories, like a shell would
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use ldbview_core::port::tool_locator::ToolLocator;

/// Locates executables on PATH, followed by extra search directories.
///
/// The extra directories cover installs that are commonly missing from a
/// non-login PATH (Homebrew, /usr/local).
pub struct PathToolLocator {
    path_var: Option<OsString>,
    extra_dirs: Vec<PathBuf>,
}

impl PathToolLocator {
    /// Use the current process PATH
    pub fn new(extra_dirs: Vec<PathBuf>) -> Self {
        Self {
            path_var: env::var_os("PATH"),
            extra_dirs,
        }
    }

    /// Use an explicit PATH value (tests, sandboxed environments)
    pub fn with_path(path_var: impl Into<OsString>, extra_dirs: Vec<PathBuf>) -> Self {
        Self {
            path_var: Some(path_var.into()),
            extra_dirs,
        }
    }

    /// Directories in search order, without duplicates
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self
            .path_var
            .as_ref()
            .map(|p| env::split_paths(p).collect())
            .unwrap_or_default();

        for dir in &self.extra_dirs {
            if !dirs.contains(dir) {
                dirs.push(dir.clone());
            }
        }
        dirs.retain(|d| !d.as_os_str().is_empty());
        dirs
    }

    fn resolve(&self, name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
        // a name with a separator is a path, not a lookup
        if name.contains(std::path::MAIN_SEPARATOR) {
            let path = PathBuf::from(name);
            return is_executable(&path).then_some(path);
        }

        dirs.iter()
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable(candidate))
    }
}

impl ToolLocator for PathToolLocator {
    fn locate(&self, candidates: &[String]) -> Option<PathBuf> {
        let dirs = self.search_dirs();

        for name in candidates {
            if let Some(path) = self.resolve(name, &dirs) {
                info!(tool = %name, path = %path.display(), "Inspection tool found");
                return Some(path);
            }
            debug!(tool = %name, "Not found on search path");
        }
        None
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
