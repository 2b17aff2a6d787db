// Browse Session - interactive request/response cycle over a Browser

use crate::application::browser::Browser;
use crate::application::parser::{KeyFilter, SEPARATOR};
use crate::domain::operation::require_key;
use crate::domain::{DbPath, DomainError, Key, Operation, Request, SessionState};
use crate::error::{AppError, Result};
use std::sync::Arc;
use tracing::debug;

/// Field values for the current mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pub key: String,
    pub value: String,
    pub use_regex: bool,
}

/// Interactive browse session.
///
/// Holds what is currently displayed (key list, selected value, status line)
/// and walks SessionState for every run. Only one invocation is ever in
/// flight: each run awaits the tool before returning.
pub struct BrowserSession {
    browser: Arc<Browser>,
    db: Option<DbPath>,
    mode: Operation,
    form: Form,
    state: SessionState,
    keys: Vec<Key>,
    value: Option<String>,
    status: String,
    pending_delete: Option<Key>,
}

impl BrowserSession {
    pub fn new(browser: Arc<Browser>) -> Self {
        // a missing tool is reported once, here
        let status = if browser.is_available() {
            "Ready".to_string()
        } else {
            browser.unavailable_error().to_string()
        };

        Self {
            browser,
            db: None,
            mode: Operation::Scan,
            form: Form::default(),
            state: SessionState::Idle,
            keys: Vec::new(),
            value: None,
            status,
            pending_delete: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> Operation {
        self.mode
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn db(&self) -> Option<&DbPath> {
        self.db.as_ref()
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    pub fn set_db(&mut self, path: &str) -> Result<()> {
        let db = DbPath::new(path)?;
        self.status = format!("Selected path: {}", db);
        self.db = Some(db);
        Ok(())
    }

    /// Switch mode, dropping form fields the new mode does not use
    pub fn set_mode(&mut self, mode: Operation) {
        if !mode.uses_key() {
            self.form.key.clear();
        }
        if !mode.uses_value() {
            self.form.value.clear();
        }
        if !mode.supports_regex() {
            self.form.use_regex = false;
        }
        self.pending_delete = None;
        self.mode = mode;
    }

    pub fn set_key(&mut self, key: impl Into<String>) {
        self.form.key = key.into();
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.form.value = value.into();
    }

    pub fn set_regex(&mut self, use_regex: bool) {
        self.form.use_regex = use_regex && self.mode.supports_regex();
    }

    /// Run the current mode with the current form fields
    pub async fn run_form(&mut self) -> Result<()> {
        let request = Request::from_form(
            self.mode,
            &self.form.key,
            &self.form.value,
            self.form.use_regex,
        )
        .inspect_err(|e| self.status = format!("Error: {}", e))?;
        self.run(request).await
    }

    /// Run one request.
    ///
    /// Validation failures leave the session untouched. Once the tool has been
    /// started the session always ends up Displaying, whether the run
    /// succeeded or not; the error is both returned and shown as status.
    pub async fn run(&mut self, request: Request) -> Result<()> {
        let db = self.validate(&request)?;

        self.state = self.state.begin()?;
        self.pending_delete = None;
        debug!(operation = %request.operation(), state = %self.state, "Session run started");

        let outcome = self.perform(&db, request).await;

        self.state = self.state.finish()?;
        if let Err(e) = &outcome {
            self.status = error_status(e);
        }
        outcome
    }

    /// Select a displayed key: fetch its value, and in delete mode stage a
    /// deletion that must be confirmed.
    pub async fn select(&mut self, item: &str) -> Result<()> {
        let key = item.split(SEPARATOR).next().unwrap_or_default().trim().to_string();
        if !self.keys.iter().any(|k| *k == key) {
            return Err(AppError::Validation(format!("Key '{}' is not displayed", key)));
        }
        let db = self.require_db()?;

        self.state = self.state.begin()?;
        self.pending_delete = None;
        let fetched = self.browser.get(&db, &key).await;
        self.state = self.state.finish()?;

        match fetched {
            Ok(value) => {
                self.value = Some(value);
                if self.mode == Operation::Delete {
                    self.status = format!("Are you sure you want to delete the key \"{}\"? (yes/no)", key);
                    self.pending_delete = Some(key);
                } else {
                    self.status = format!("Selected key: {}", key);
                }
                Ok(())
            }
            Err(e) => {
                self.value = Some(error_status(&e));
                self.status = error_status(&e);
                Err(e)
            }
        }
    }

    /// Answer a staged deletion
    pub async fn confirm_delete(&mut self, confirmed: bool) -> Result<()> {
        let key = self
            .pending_delete
            .take()
            .ok_or(DomainError::NothingToConfirm)?;

        if !confirmed {
            self.status = format!("Kept key: {}", key);
            return Ok(());
        }

        let db = self.require_db()?;
        self.state = self.state.begin()?;
        let deleted = self.browser.delete(&db, &key).await;
        self.state = self.state.finish()?;

        match deleted {
            Ok(()) => {
                self.keys.retain(|k| *k != key);
                self.value = None;
                self.status = format!("Successfully deleted key: {}", key);
                Ok(())
            }
            Err(e) => {
                self.status = format!("Error deleting key: {}", e);
                Err(e)
            }
        }
    }

    /// Displaying -> Idle, dropping everything shown
    pub fn clear(&mut self) -> Result<()> {
        self.state = self.state.clear()?;
        self.keys.clear();
        self.value = None;
        self.pending_delete = None;
        self.status = "Results cleared".to_string();
        Ok(())
    }

    fn require_db(&mut self) -> Result<DbPath> {
        match &self.db {
            Some(db) => Ok(db.clone()),
            None => {
                self.status = "Error: No path specified".to_string();
                Err(AppError::Validation("No path specified".to_string()))
            }
        }
    }

    /// Checks that must pass before anything is spawned
    fn validate(&mut self, request: &Request) -> Result<DbPath> {
        let db = self.require_db()?;
        if let Request::GetMatching { pattern } = request {
            require_key(pattern.clone()).inspect_err(|e| self.status = format!("Error: {}", e))?;
        }
        let pattern = match request {
            Request::Scan { filter } => filter.as_deref(),
            Request::GetMatching { pattern } => Some(pattern.as_str()),
            _ => None,
        };
        if let Some(pattern) = pattern {
            KeyFilter::new(pattern).inspect_err(|e| self.status = e.to_string())?;
        }
        Ok(db)
    }

    async fn perform(&mut self, db: &DbPath, request: Request) -> Result<()> {
        match request {
            Request::Scan { filter } => self.show_scan(db, filter.as_deref()).await,
            Request::GetMatching { pattern } => {
                self.keys.clear();
                self.value = None;
                let outcome = self.browser.get_matching(db, &pattern).await?;
                self.keys = outcome.keys();
                self.status = outcome.status_message();
                Ok(())
            }
            Request::Get { key } => {
                self.keys.clear();
                self.value = None;
                let value = self.browser.get(db, &key).await?;
                self.keys.push(key);
                self.value = Some(value);
                self.status = "Command executed successfully".to_string();
                Ok(())
            }
            Request::Put { key, value } => {
                self.browser.put(db, &key, &value).await?;
                self.value = None;
                // the write stands even if the refresh fails
                match self.browser.scan(db, None).await {
                    Ok(outcome) => {
                        self.keys = outcome.keys();
                        self.status = format!("Successfully put key: {}", key);
                    }
                    Err(e) => {
                        self.keys.clear();
                        self.status = format!("Successfully put key: {} (rescan failed: {})", key, e);
                    }
                }
                Ok(())
            }
            Request::Delete { key } => {
                let value = self.browser.get(db, &key).await?;
                if !self.keys.contains(&key) {
                    self.keys.push(key.clone());
                }
                self.value = Some(value);
                self.status = format!("Are you sure you want to delete the key \"{}\"? (yes/no)", key);
                self.pending_delete = Some(key);
                Ok(())
            }
        }
    }

    async fn show_scan(&mut self, db: &DbPath, pattern: Option<&str>) -> Result<()> {
        self.keys.clear();
        self.value = None;
        let outcome = self.browser.scan(db, pattern).await?;
        self.keys = outcome.keys();
        self.status = outcome.status_message();
        Ok(())
    }
}

fn error_status(err: &AppError) -> String {
    match err {
        AppError::Invocation { .. } => err.to_string(),
        other => format!("Error: {}", other),
    }
}
