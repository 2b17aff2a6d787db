//! Layered configuration: defaults, TOML file, then `LDBVIEW_*` environment

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use ldbview_core::port::DEFAULT_TOOL_CANDIDATES;
use ldbview_core::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directories searched after PATH
pub const DEFAULT_SEARCH_DIRS: [&str; 2] = ["/usr/local/bin", "/opt/homebrew/bin"];

const ENV_PREFIX: &str = "LDBVIEW";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Database directory used when --db is not given
    pub db_path: Option<String>,
    /// Explicit tool path or name; skips candidate discovery
    pub tool: Option<String>,
    pub tool_candidates: Vec<String>,
    pub search_dirs: Vec<String>,
    pub log_format: LogFormat,
    pub log_filter: String,
    pub history_file: Option<String>,
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// An explicit `file` must exist; the default per-user file is optional.
    pub fn load(file: Option<&Path>) -> ldbview_core::Result<Self> {
        Self::load_with_env(file, None)
    }

    /// Same as [`Settings::load`], reading variables from `env` instead of the
    /// process environment when given.
    pub fn load_with_env(
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> ldbview_core::Result<Self> {
        Self::layered(file, env).map_err(|e| AppError::Config(e.to_string()))
    }

    fn layered(
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let candidates: Vec<&str> = DEFAULT_TOOL_CANDIDATES.to_vec();
        let search_dirs: Vec<&str> = DEFAULT_SEARCH_DIRS.to_vec();

        let mut builder = Config::builder()
            .set_default("tool_candidates", candidates)?
            .set_default("search_dirs", search_dirs)?
            .set_default("log_format", "compact")?
            .set_default("log_filter", "ldbview=warn")?;

        builder = match file {
            Some(path) => builder.add_source(File::from(path).format(FileFormat::Toml).required(true)),
            None => match Self::default_config_file() {
                Some(path) => builder.add_source(
                    File::from(path)
                        .format(FileFormat::Toml)
                        .required(false),
                ),
                None => builder,
            },
        };

        let environment = Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("tool_candidates")
            .with_list_parse_key("search_dirs")
            .source(env);

        builder.add_source(environment).build()?.try_deserialize()
    }

    /// `<config dir>/ldbview/config.toml`
    pub fn default_config_file() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ldbview").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Shell history location: configured, else `<data dir>/ldbview/history.txt`
    pub fn history_path(&self) -> Option<PathBuf> {
        match &self.history_file {
            Some(path) => Some(expand(path)),
            None => ProjectDirs::from("", "", "ldbview").map(|dirs| dirs.data_dir().join("history.txt")),
        }
    }

    pub fn search_dir_paths(&self) -> Vec<PathBuf> {
        self.search_dirs.iter().map(|d| expand(d)).collect()
    }
}

/// Expand a leading `~` to the home directory
pub fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
