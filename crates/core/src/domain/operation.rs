// Operation & Request Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Operation offered by the inspection tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Scan,
    Get,
    Put,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Scan,
        Operation::Get,
        Operation::Put,
        Operation::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Scan => "scan",
            Operation::Get => "get",
            Operation::Put => "put",
            Operation::Delete => "delete",
        }
    }

    /// Whether the key field means anything in this mode
    pub fn uses_key(&self) -> bool {
        !matches!(self, Operation::Scan)
    }

    pub fn uses_value(&self) -> bool {
        matches!(self, Operation::Put)
    }

    /// Only `get` can treat its key as a pattern
    pub fn supports_regex(&self) -> bool {
        matches!(self, Operation::Get)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scan" => Ok(Operation::Scan),
            "get" => Ok(Operation::Get),
            "put" => Ok(Operation::Put),
            "delete" => Ok(Operation::Delete),
            other => Err(DomainError::UnknownOperation(other.to_string())),
        }
    }
}

/// Location of the database directory handed to the tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbPath(String);

impl DbPath {
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "No path specified".to_string(),
            ));
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `--db=<path>` argument
    pub fn to_arg(&self) -> String {
        format!("--db={}", self.0)
    }
}

impl std::fmt::Display for DbPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One invocation of the inspection tool, already validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCommand {
    Scan,
    Get { key: String },
    Put { key: String, value: String },
    Delete { key: String },
}

impl ToolCommand {
    pub fn get(key: impl Into<String>) -> Result<Self> {
        Ok(ToolCommand::Get {
            key: require_key(key.into())?,
        })
    }

    pub fn put(key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let (key, value) = require_pair(key.into(), value.into())?;
        Ok(ToolCommand::Put { key, value })
    }

    pub fn delete(key: impl Into<String>) -> Result<Self> {
        Ok(ToolCommand::Delete {
            key: require_key(key.into())?,
        })
    }

    pub fn operation(&self) -> Operation {
        match self {
            ToolCommand::Scan => Operation::Scan,
            ToolCommand::Get { .. } => Operation::Get,
            ToolCommand::Put { .. } => Operation::Put,
            ToolCommand::Delete { .. } => Operation::Delete,
        }
    }

    /// Full argument list, `--db=<path>` first
    pub fn args(&self, db: &DbPath) -> Vec<String> {
        let mut args = vec![db.to_arg(), self.operation().as_str().to_string()];
        match self {
            ToolCommand::Scan => {}
            ToolCommand::Get { key } | ToolCommand::Delete { key } => args.push(key.clone()),
            ToolCommand::Put { key, value } => {
                args.push(key.clone());
                args.push(value.clone());
            }
        }
        args
    }
}

/// A user request, validated from the raw form fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Scan { filter: Option<String> },
    Get { key: String },
    /// `get` with the regex flag: a scan filtered by the key text
    GetMatching { pattern: String },
    Put { key: String, value: String },
    Delete { key: String },
}

impl Request {
    /// Build a request from the fields a user filled in.
    ///
    /// Fields the operation does not use are ignored, matching what the
    /// mode switch of an interactive session disables.
    pub fn from_form(operation: Operation, key: &str, value: &str, use_regex: bool) -> Result<Self> {
        match operation {
            Operation::Scan => Ok(Request::Scan { filter: None }),
            Operation::Get => {
                let key = require_key(key.to_string())?;
                if use_regex {
                    Ok(Request::GetMatching { pattern: key })
                } else {
                    Ok(Request::Get { key })
                }
            }
            Operation::Put => {
                let (key, value) = require_pair(key.to_string(), value.to_string())?;
                Ok(Request::Put { key, value })
            }
            Operation::Delete => Ok(Request::Delete {
                key: require_key(key.to_string())?,
            }),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Request::Scan { .. } => Operation::Scan,
            Request::Get { .. } | Request::GetMatching { .. } => Operation::Get,
            Request::Put { .. } => Operation::Put,
            Request::Delete { .. } => Operation::Delete,
        }
    }
}

pub(crate) fn require_key(key: String) -> Result<String> {
    if key.is_empty() {
        return Err(DomainError::ValidationError(
            "No key specified".to_string(),
        ));
    }
    Ok(key)
}

fn require_pair(key: String, value: String) -> Result<(String, String)> {
    if key.is_empty() || value.is_empty() {
        return Err(DomainError::ValidationError(
            "Both key and value are required for put command".to_string(),
        ));
    }
    Ok((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> DbPath {
        DbPath::new("/data/db").unwrap()
    }

    #[test]
    fn test_operation_round_trips_through_str() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
        assert_eq!(" DELETE ".parse::<Operation>().unwrap(), Operation::Delete);
        assert!(matches!(
            "merge".parse::<Operation>(),
            Err(DomainError::UnknownOperation(_))
        ));
    }

    #[test]
    fn test_operation_field_flags() {
        assert!(!Operation::Scan.uses_key());
        assert!(Operation::Delete.uses_key());
        assert!(Operation::Put.uses_value());
        assert!(!Operation::Get.uses_value());
        assert!(Operation::Get.supports_regex());
        assert!(!Operation::Put.supports_regex());
    }

    #[test]
    fn test_db_path_rejects_blank() {
        assert!(DbPath::new("").is_err());
        assert!(DbPath::new("   ").is_err());
        assert_eq!(db().to_arg(), "--db=/data/db");
    }

    #[test]
    fn test_tool_command_args() {
        assert_eq!(ToolCommand::Scan.args(&db()), vec!["--db=/data/db", "scan"]);
        assert_eq!(
            ToolCommand::get("k1").unwrap().args(&db()),
            vec!["--db=/data/db", "get", "k1"]
        );
        assert_eq!(
            ToolCommand::put("k1", "v 1").unwrap().args(&db()),
            vec!["--db=/data/db", "put", "k1", "v 1"]
        );
        assert_eq!(
            ToolCommand::delete("k1").unwrap().args(&db()),
            vec!["--db=/data/db", "delete", "k1"]
        );
    }

    #[test]
    fn test_put_requires_key_and_value() {
        let err = ToolCommand::put("", "v").unwrap_err();
        assert!(err.to_string().contains("Both key and value"));
        assert!(ToolCommand::put("k", "").is_err());
        assert!(ToolCommand::put("k", "v").is_ok());
    }

    #[test]
    fn test_request_from_form() {
        assert_eq!(
            Request::from_form(Operation::Scan, "ignored", "ignored", true).unwrap(),
            Request::Scan { filter: None }
        );
        assert_eq!(
            Request::from_form(Operation::Get, "^user:", "", true).unwrap(),
            Request::GetMatching {
                pattern: "^user:".to_string()
            }
        );
        assert_eq!(
            Request::from_form(Operation::Get, "k", "ignored", false).unwrap(),
            Request::Get {
                key: "k".to_string()
            }
        );
        assert!(Request::from_form(Operation::Get, "", "", false)
            .unwrap_err()
            .to_string()
            .contains("No key specified"));
        assert!(Request::from_form(Operation::Delete, "", "", false).is_err());
        assert_eq!(
            Request::from_form(Operation::Put, "k", "v", false)
                .unwrap()
                .operation(),
            Operation::Put
        );
    }
}
