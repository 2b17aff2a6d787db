//! ldbview CLI - browse a RocksDB directory through the `ldb` inspection tool
//!
//! Two modes:
//! - **Command mode**: `ldbview --db PATH scan` - single command, exit
//! - **Shell mode**: `ldbview --db PATH [shell]` - interactive prompt (pipe mode if stdin is not a TTY)

mod render;
mod settings;
mod shell;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use ldbview_core::application::{Browser, BrowserSession};
use ldbview_core::domain::DbPath;
use ldbview_core::port::time_provider::SystemTimeProvider;
use ldbview_core::port::ToolLocator;
use ldbview_infra_system::{PathToolLocator, SubprocessRunner};
use render::OutputMode;
use serde_json::json;
use settings::Settings;
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "ldbview")]
#[command(about = "Browse RocksDB databases through the ldb inspection tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Database directory
    #[arg(long, global = true)]
    db: Option<String>,

    /// Inspection tool path or name (skips discovery)
    #[arg(long, global = true)]
    tool: Option<String>,

    /// Configuration file (TOML)
    #[arg(long, env = "LDBVIEW_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List keys
    Scan {
        /// Only keys matching this regex
        #[arg(short, long)]
        filter: Option<String>,

        /// Show values next to keys
        #[arg(long)]
        values: bool,
    },

    /// Show the value of a key
    Get {
        key: String,

        /// Treat KEY as a regex and list matching keys instead
        #[arg(short, long)]
        regex: bool,
    },

    /// Store a value
    Put { key: String, value: String },

    /// Delete a key after showing its value
    Delete {
        key: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show tool discovery and configuration
    Status,

    /// Interactive browse shell (default)
    Shell,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match run(cli, mode).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", render::error(&e, mode));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<ExitCode> {
    // 1. Configuration
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // 2. Logging
    telemetry::init_logging(settings.log_format, &settings.log_filter)?;
    info!(version = VERSION, "ldbview starting");

    // 3. Tool discovery (reported once, here)
    let browser = Arc::new(build_browser(&cli, &settings));
    if !browser.is_available() {
        tracing::warn!("Inspection tool not found; commands will fail until one is installed");
    }

    let db_arg = cli.db.clone().or_else(|| settings.db_path.clone());

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Scan { filter, values } => {
            let db = require_db(db_arg.as_deref())?;
            let outcome = browser.scan(&db, filter.as_deref()).await?;
            println!("{}", render::scan(&outcome, values, mode));
        }

        Commands::Get { key, regex: true } => {
            let db = require_db(db_arg.as_deref())?;
            let outcome = browser.get_matching(&db, &key).await?;
            println!("{}", render::scan(&outcome, false, mode));
        }

        Commands::Get { key, regex: false } => {
            let db = require_db(db_arg.as_deref())?;
            let value = browser.get(&db, &key).await?;
            println!("{}", render::value(&key, &value, mode));
        }

        Commands::Put { key, value } => {
            let db = require_db(db_arg.as_deref())?;
            browser.put(&db, &key, &value).await?;

            // the write already happened; a failed refresh is only reported
            let rescan = browser.scan(&db, None).await;
            match (mode, rescan) {
                (OutputMode::Json, Ok(outcome)) => println!(
                    "{}",
                    json!({ "ok": true, "key": key, "keys": outcome.keys() })
                ),
                (OutputMode::Json, Err(e)) => println!(
                    "{}",
                    json!({ "ok": true, "key": key, "keys": null, "rescan_error": e.to_string() })
                ),
                (OutputMode::Human, Ok(outcome)) => {
                    println!("{}", render::success(&format!("Successfully put key: {}", key), mode));
                    println!("{}", render::scan(&outcome, false, mode));
                }
                (OutputMode::Human, Err(e)) => {
                    println!("{}", render::success(&format!("Successfully put key: {}", key), mode));
                    eprintln!("{}", render::notice(&format!("Could not refresh the key list: {}", e), mode));
                }
            }
        }

        Commands::Delete { key, yes } => {
            let db = require_db(db_arg.as_deref())?;
            let value = browser.get(&db, &key).await?;
            if mode == OutputMode::Human {
                println!("{}", render::value(&key, &value, mode));
            }

            if !yes && !confirm(&format!("Are you sure you want to delete the key \"{}\"?", key))? {
                println!("{}", render::notice(&format!("Kept key: {}", key), mode));
                return Ok(ExitCode::SUCCESS);
            }

            browser.delete(&db, &key).await?;
            println!("{}", render::success(&format!("Successfully deleted key: {}", key), mode));
        }

        Commands::Status => print_status(&browser, &settings, db_arg.as_deref(), cli.config.as_deref(), mode),

        Commands::Shell => {
            let mut session = BrowserSession::new(browser.clone());
            if let Some(db) = &db_arg {
                session.set_db(&settings::expand(db).to_string_lossy())?;
            }

            if std::io::stdin().is_terminal() {
                shell::run_repl(&mut session, settings.history_path()).await?;
            } else if !shell::run_pipe(&mut session, mode).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Explicit --tool wins; otherwise the first configured candidate found
fn build_browser(cli: &Cli, settings: &Settings) -> Browser {
    let candidates: Vec<String> = match cli.tool.as_ref().or(settings.tool.as_ref()) {
        Some(tool) => vec![settings::expand(tool).to_string_lossy().into_owned()],
        None => settings.tool_candidates.clone(),
    };

    let locator = PathToolLocator::new(settings.search_dir_paths());
    let tool = locator.locate(&candidates);

    let runner = Arc::new(SubprocessRunner::new(Arc::new(SystemTimeProvider)));
    Browser::new(runner, tool, candidates)
}

fn require_db(path: Option<&str>) -> Result<DbPath> {
    let path = path.context("No database path given (use --db or set LDBVIEW_DB_PATH)")?;
    Ok(DbPath::new(settings::expand(path).to_string_lossy())?)
}

/// Ask on stderr, answer on stdin; anything but y/yes declines
fn confirm(question: &str) -> ldbview_core::Result<bool> {
    eprint!("{} [y/N] ", question.yellow());
    std::io::stderr().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_status(
    browser: &Browser,
    settings: &Settings,
    db: Option<&str>,
    config: Option<&Path>,
    mode: OutputMode,
) {
    let tool = browser.tool().map(|p| p.display().to_string());
    let config_file = config.map(Path::to_path_buf).or_else(Settings::default_config_file);

    if mode == OutputMode::Json {
        println!(
            "{}",
            json!({
                "version": VERSION,
                "tool": tool,
                "tool_candidates": settings.tool_candidates,
                "search_dirs": settings.search_dirs,
                "db_path": db,
                "config_file": config_file,
            })
        );
        return;
    }

    println!("{}", format!("ldbview v{}", VERSION).cyan().bold());
    println!();
    match &tool {
        Some(path) => println!("  {} {} {}", "Tool:".bold(), "FOUND".green(), path),
        None => println!(
            "  {} {} (looked for: {})",
            "Tool:".bold(),
            "NOT FOUND".red(),
            settings.tool_candidates.join(", ")
        ),
    }
    println!("  {} {}", "Search dirs:".bold(), settings.search_dirs.join(":"));
    println!("  {} {}", "Database:".bold(), db.unwrap_or("(none)"));
    if let Some(path) = config_file {
        println!("  {} {}", "Config file:".bold(), path.display());
    }
    println!("  {} {:?}", "Log format:".bold(), settings.log_format);
}
