//! Human (colored tables) and JSON rendering of command outcomes

use colored::Colorize;
use ldbview_core::application::ScanOutcome;
use serde_json::json;
use tabled::{settings::Style, Table, Tabled};

/// Longest value shown in a table cell
const MAX_CELL_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

#[derive(Tabled)]
struct KeyRow {
    #[tabled(rename = "#")]
    index: usize,
    key: String,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "#")]
    index: usize,
    key: String,
    value: String,
}

/// Numbered key list, the numbers are what `select` accepts in the shell
pub fn keys(keys: &[String]) -> String {
    if keys.is_empty() {
        return "(no keys)".yellow().to_string();
    }
    let rows = keys.iter().enumerate().map(|(i, key)| KeyRow {
        index: i + 1,
        key: key.clone(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn scan(outcome: &ScanOutcome, show_values: bool, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            if show_values {
                json!({ "entries": outcome.entries, "filter": outcome.filter }).to_string()
            } else {
                json!({ "keys": outcome.keys(), "filter": outcome.filter }).to_string()
            }
        }
        OutputMode::Human => {
            let table = if show_values && !outcome.entries.is_empty() {
                let rows = outcome.entries.iter().enumerate().map(|(i, e)| EntryRow {
                    index: i + 1,
                    key: e.key.clone(),
                    value: truncate(&e.value, MAX_CELL_CHARS),
                });
                Table::new(rows).with(Style::rounded()).to_string()
            } else {
                keys(&outcome.keys())
            };
            format!("{}\n{}", table, outcome.status_message().green().bold())
        }
    }
}

pub fn value(key: &str, value: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json!({ "key": key, "value": value }).to_string(),
        OutputMode::Human => format!("{}\n{}", key.cyan().bold(), value),
    }
}

/// What a shell command left on screen: the selected value, else the key list
pub fn display(shown: &[String], value: Option<&str>, status: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json!({ "keys": shown, "value": value, "status": status }).to_string(),
        OutputMode::Human => {
            let body = match value {
                Some(value) => value.to_string(),
                None => keys(shown),
            };
            format!("{}\n{}", body, status.green())
        }
    }
}

/// Status line for a completed mutation
pub fn success(message: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json!({ "ok": true, "message": message }).to_string(),
        OutputMode::Human => format!("✓ {}", message).green().bold().to_string(),
    }
}

pub fn notice(message: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json!({ "ok": true, "message": message }).to_string(),
        OutputMode::Human => message.yellow().to_string(),
    }
}

pub fn error(err: &anyhow::Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json!({ "ok": false, "error": format!("{:#}", err) }).to_string(),
        OutputMode::Human => format!("✗ {:#}", err).red().to_string(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
