// Entry Domain Model

use serde::{Deserialize, Serialize};

/// A key as printed by the inspection tool
pub type Key = String;

/// One key/value row of tool output.
///
/// Both sides are opaque text. Ordering and uniqueness belong to the store,
/// so nothing here checks them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub key: Key,
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
