// Result Parser
// Pure transformation of scan output into keys and entries

use crate::domain::{Entry, Key};
use crate::error::Result;
use regex::Regex;

/// Delimits key from value in the tool's output
pub const SEPARATOR: &str = " ==> ";

/// Keys of every data row, in output order.
///
/// A data row is any line containing SEPARATOR; the key is the text before
/// the first occurrence, trimmed. Other lines are skipped.
pub fn parse_keys(output: &str) -> Vec<Key> {
    output
        .lines()
        .filter_map(|line| line.split_once(SEPARATOR))
        .map(|(key, _)| key.trim().to_string())
        .collect()
}

/// Like [`parse_keys`] but keeps the value (everything after the first separator)
pub fn parse_entries(output: &str) -> Vec<Entry> {
    output
        .lines()
        .filter_map(|line| line.split_once(SEPARATOR))
        .map(|(key, value)| Entry::new(key.trim(), value))
        .collect()
}

/// Compiled key filter with unanchored search semantics
#[derive(Debug, Clone)]
pub struct KeyFilter {
    regex: Regex,
}

impl KeyFilter {
    /// # Errors
    /// AppError::InvalidPattern if the pattern does not compile
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Parse scan output, optionally keeping only keys that match `pattern`.
///
/// The pattern is compiled before any line is examined, so an invalid one
/// yields an error and never a partial list.
pub fn parse_scan(output: &str, pattern: Option<&str>) -> Result<Vec<Key>> {
    let filter = pattern.map(KeyFilter::new).transpose()?;
    let keys = parse_keys(output);

    Ok(match filter {
        Some(filter) => keys.into_iter().filter(|k| filter.matches(k)).collect(),
        None => keys,
    })
}

/// Entry flavour of [`parse_scan`]
pub fn parse_scan_entries(output: &str, pattern: Option<&str>) -> Result<Vec<Entry>> {
    let filter = pattern.map(KeyFilter::new).transpose()?;
    let entries = parse_entries(output);

    Ok(match filter {
        Some(filter) => entries
            .into_iter()
            .filter(|e| filter.matches(&e.key))
            .collect(),
        None => entries,
    })
}
