//! Interactive browse shell.
//!
//! - **REPL mode**: prompt with history when stdin is a terminal
//! - **Pipe mode**: one command per line from stdin, no prompt

use crate::render::{self, OutputMode};
use anyhow::Result;
use colored::Colorize;
use ldbview_core::application::BrowserSession;
use ldbview_core::domain::{DomainError, Operation, Request};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::debug;

const HELP: &str = "\
Commands:
  db <path>              set the database directory
  mode <scan|get|put|delete>
                         choose the operation used by `run` and `select`
  run [key] [value]      run the current mode with the given fields
  scan [pattern]         list keys, optionally filtered by a regex
  get <key>              show the value of a key
  get -r <pattern>       list keys matching a regex
  put <key> <value>      store a value, then rescan
  delete <key>           show a key's value and ask to delete it
  select <n|key>         fetch a displayed key (asks to delete in delete mode)
  yes | no               answer a pending delete
  keys                   show the displayed keys again
  clear                  clear displayed results
  status                 show session status
  help                   show this help
  quit                   leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Db(String),
    Mode(Operation),
    Run {
        key: Option<String>,
        value: Option<String>,
    },
    Request(Request),
    Select(String),
    Confirm(bool),
    Keys,
    Clear,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Parse one input line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> std::result::Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let words = shlex::split(line).ok_or_else(|| "Unbalanced quotes".to_string())?;
    let Some((head, rest)) = words.split_first() else {
        return Ok(None);
    };

    let command = match (head.to_ascii_lowercase().as_str(), rest) {
        ("db", [path]) => ShellCommand::Db(path.clone()),
        ("mode", [op]) => ShellCommand::Mode(op.parse().map_err(|e: DomainError| e.to_string())?),
        ("run", []) => ShellCommand::Run { key: None, value: None },
        ("run", [key]) => ShellCommand::Run {
            key: Some(key.clone()),
            value: None,
        },
        ("run", [key, value]) => ShellCommand::Run {
            key: Some(key.clone()),
            value: Some(value.clone()),
        },
        ("scan", []) => ShellCommand::Request(Request::Scan { filter: None }),
        ("scan", [pattern]) => ShellCommand::Request(Request::Scan {
            filter: Some(pattern.clone()),
        }),
        ("get", [flag, pattern]) if flag == "-r" || flag == "--regex" => {
            ShellCommand::Request(form(Operation::Get, pattern, "", true)?)
        }
        ("get", [key]) => ShellCommand::Request(form(Operation::Get, key, "", false)?),
        ("put", [key, value]) => ShellCommand::Request(form(Operation::Put, key, value, false)?),
        ("delete", [key]) => ShellCommand::Request(form(Operation::Delete, key, "", false)?),
        ("select", [item]) => ShellCommand::Select(item.clone()),
        ("yes" | "y", []) => ShellCommand::Confirm(true),
        ("no" | "n", []) => ShellCommand::Confirm(false),
        ("keys", []) => ShellCommand::Keys,
        ("clear", []) => ShellCommand::Clear,
        ("status", []) => ShellCommand::Status,
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit", []) => ShellCommand::Quit,
        (other, _) => return Err(format!("Unknown or malformed command '{}' (try `help`)", other)),
    };
    Ok(Some(command))
}

fn form(operation: Operation, key: &str, value: &str, use_regex: bool) -> std::result::Result<Request, String> {
    Request::from_form(operation, key, value, use_regex).map_err(|e| e.to_string())
}

/// `select 2` picks the second displayed key; anything else is a key
fn resolve_selection(session: &BrowserSession, item: &str) -> String {
    match item.parse::<usize>() {
        Ok(n) if n >= 1 && n <= session.keys().len() => session.keys()[n - 1].clone(),
        _ => item.to_string(),
    }
}

/// Execute one command against the session and print its outcome.
///
/// Errors are already reflected in the session; the caller prints them.
pub async fn execute(
    session: &mut BrowserSession,
    command: ShellCommand,
    mode: OutputMode,
) -> ldbview_core::Result<Flow> {
    debug!(command = ?command, state = %session.state(), "Shell command");

    match command {
        ShellCommand::Quit => return Ok(Flow::Exit),
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Db(path) => {
            session.set_db(&crate::settings::expand(&path).to_string_lossy())?;
            println!("{}", render::notice(session.status(), mode));
        }
        ShellCommand::Mode(op) => {
            session.set_mode(op);
            println!("{}", render::notice(&format!("Mode: {}", op), mode));
        }
        ShellCommand::Run { key, value } => {
            if let Some(key) = key {
                session.set_key(key);
            }
            if let Some(value) = value {
                session.set_value(value);
            }
            session.run_form().await?;
            println!("{}", render::display(session.keys(), session.value(), session.status(), mode));
        }
        ShellCommand::Request(request) => {
            session.run(request).await?;
            println!("{}", render::display(session.keys(), session.value(), session.status(), mode));
        }
        ShellCommand::Select(item) => {
            let key = resolve_selection(session, &item);
            session.select(&key).await?;
            println!("{}", render::display(session.keys(), session.value(), session.status(), mode));
        }
        ShellCommand::Confirm(yes) => {
            session.confirm_delete(yes).await?;
            println!("{}", render::notice(session.status(), mode));
        }
        ShellCommand::Keys => println!("{}", render::display(session.keys(), None, session.status(), mode)),
        ShellCommand::Clear => {
            session.clear()?;
            println!("{}", render::notice(session.status(), mode));
        }
        ShellCommand::Status => print_status(session),
    }
    Ok(Flow::Continue)
}

fn print_status(session: &BrowserSession) {
    let tool = session
        .browser()
        .tool()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "not found".to_string());
    let db = session
        .db()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "(none)".to_string());

    println!("  {} {}", "Tool:".bold(), tool);
    println!("  {} {}", "Database:".bold(), db);
    println!("  {} {}", "Mode:".bold(), session.mode());
    println!("  {} {}", "State:".bold(), session.state());
    println!("  {} {}", "Keys shown:".bold(), session.keys().len());
    if let Some(key) = session.pending_delete() {
        println!("  {} {}", "Pending delete:".bold(), key);
    }
}

fn prompt(session: &BrowserSession) -> String {
    if session.pending_delete().is_some() {
        return "delete? (yes/no)> ".to_string();
    }
    format!("ldbview[{}]> ", session.mode())
}

/// Parse and execute one line; false when it failed
async fn dispatch(session: &mut BrowserSession, line: &str, mode: OutputMode) -> (Flow, bool) {
    let result = match parse_line(line) {
        Ok(Some(command)) => execute(session, command, mode).await.map_err(anyhow::Error::from),
        Ok(None) => Ok(Flow::Continue),
        Err(e) => Err(anyhow::anyhow!(e)),
    };
    match result {
        Ok(flow) => (flow, true),
        Err(e) => {
            println!("{}", render::error(&e, mode));
            (Flow::Continue, false)
        }
    }
}

/// Interactive prompt with history
pub async fn run_repl(session: &mut BrowserSession, history: Option<PathBuf>) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    if let Some(path) = &history {
        // first run has no history yet
        let _ = editor.load_history(path);
    }

    println!(
        "{} {}",
        format!("ldbview v{}", ldbview_core::VERSION).cyan().bold(),
        "(type `help` for commands)".dimmed()
    );
    println!("{}", session.status());

    loop {
        match editor.readline(&prompt(session)) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.as_str())?;
                }
                let (flow, _) = dispatch(session, &line, OutputMode::Human).await;
                if flow == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(path) = &history {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        editor.save_history(path)?;
    }
    Ok(())
}

/// Line-by-line commands from stdin; returns false if any command failed
pub async fn run_pipe(session: &mut BrowserSession, mode: OutputMode) -> Result<bool> {
    let mut all_ok = true;
    for line in std::io::stdin().lock().lines() {
        let (flow, ok) = dispatch(session, &line?, mode).await;
        all_ok &= ok;
        if flow == Flow::Exit {
            break;
        }
    }
    Ok(all_ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ShellCommand {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# scan").unwrap(), None);
    }

    #[test]
    fn test_requests() {
        assert_eq!(parse("scan"), ShellCommand::Request(Request::Scan { filter: None }));
        assert_eq!(
            parse("get -r '^user:'"),
            ShellCommand::Request(Request::GetMatching {
                pattern: "^user:".to_string()
            })
        );
        assert_eq!(
            parse("put \"my key\" 'a value'"),
            ShellCommand::Request(Request::Put {
                key: "my key".to_string(),
                value: "a value".to_string()
            })
        );
        assert_eq!(
            parse("DELETE k"),
            ShellCommand::Request(Request::Delete {
                key: "k".to_string()
            })
        );
    }

    #[test]
    fn test_session_commands() {
        assert_eq!(parse("mode put"), ShellCommand::Mode(Operation::Put));
        assert_eq!(parse("select 3"), ShellCommand::Select("3".to_string()));
        assert_eq!(parse("y"), ShellCommand::Confirm(true));
        assert_eq!(parse("no"), ShellCommand::Confirm(false));
        assert_eq!(
            parse("run k v"),
            ShellCommand::Run {
                key: Some("k".to_string()),
                value: Some("v".to_string())
            }
        );
        assert_eq!(parse("quit"), ShellCommand::Quit);
    }

    #[test]
    fn test_rejected_lines() {
        assert!(parse_line("put k").is_err());
        assert!(parse_line("put '' v").unwrap_err().contains("Both key and value"));
        assert!(parse_line("mode merge").is_err());
        assert!(parse_line("get 'unterminated").is_err());
        assert!(parse_line("frobnicate").is_err());
    }
}
