//! Types for the migration system.

use crate::db::DbError;
use crate::source::SourceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Structured failure code reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Creating the bookkeeping table failed.
    #[serde(rename = "DB01")]
    Db01,
    /// Reading applied history failed.
    #[serde(rename = "DB02")]
    Db02,
    /// Running a new migration or recording it failed.
    #[serde(rename = "DB03")]
    Db03,
    /// Reading the migrations directory or a migration file failed.
    #[serde(rename = "FS01")]
    Fs01,
    /// A previously applied migration file is missing.
    #[serde(rename = "FS02")]
    Fs02,
    /// The order of previously applied migration files changed.
    #[serde(rename = "FS03")]
    Fs03,
    /// The contents of a previously applied migration file changed.
    #[serde(rename = "FS04")]
    Fs04,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Db01 => "DB01",
            Self::Db02 => "DB02",
            Self::Db03 => "DB03",
            Self::Fs01 => "FS01",
            Self::Fs02 => "FS02",
            Self::Fs03 => "FS03",
            Self::Fs04 => "FS04",
        }
    }

    /// Whether the caller can retry after fixing the environment, as opposed
    /// to needing a human to repair the migration history.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Db01 | Self::Db02 | Self::Db03 | Self::Fs01)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error types for migration runs. Each variant maps to one [`ErrorCode`].
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("Error creating '{table}' database table")]
    CreateTable { table: String, source: DbError },

    #[error("Error querying previously run migrations from '{table}' database table")]
    QueryHistory { table: String, source: DbError },

    #[error("Error running database migration: {filename}")]
    Migration { filename: String, source: DbError },

    #[error("Error reading migrations from directory: {directory}")]
    ReadDirectory { directory: String, source: SourceError },

    #[error("Error reading migration file: {filename}")]
    ReadFile { filename: String, source: SourceError },

    #[error("Missing previously run migration files: {}", .0.join(","))]
    MissingFiles(Vec<String>),

    #[error("Expected migration {expected} but found {found} at index {index}")]
    OrderMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("Contents of {filename} changed after migration was run; revert changes and try again")]
    ChecksumMismatch { filename: String },
}

impl MigrateError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::CreateTable { .. } => ErrorCode::Db01,
            Self::QueryHistory { .. } => ErrorCode::Db02,
            Self::Migration { .. } => ErrorCode::Db03,
            Self::ReadDirectory { .. } | Self::ReadFile { .. } => ErrorCode::Fs01,
            Self::MissingFiles(_) => ErrorCode::Fs02,
            Self::OrderMismatch { .. } => ErrorCode::Fs03,
            Self::ChecksumMismatch { .. } => ErrorCode::Fs04,
        }
    }

    /// Text of the underlying driver or I/O error, if there is one
    pub fn cause(&self) -> Option<String> {
        match self {
            Self::CreateTable { source, .. }
            | Self::QueryHistory { source, .. }
            | Self::Migration { source, .. } => Some(source.to_string()),
            Self::ReadDirectory { source, .. } | Self::ReadFile { source, .. } => {
                Some(source.to_string())
            }
            _ => None,
        }
    }
}

/// Result of a migration run, as surfaced to callers.
///
/// Serializes to `{ success, message, count, lastRun, error, code }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationResult {
    /// Whether the run finished without error.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Number of migrations committed by this run.
    pub count: usize,
    /// Last migration committed by this run.
    pub last_run: Option<String>,
    /// Underlying error text on failure.
    pub error: Option<String>,
    /// Failure code; absent on success.
    pub code: Option<ErrorCode>,
    /// New migrations found but not run (status checks only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending: Vec<String>,
}

/// Whether a run applies new migrations or only reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Apply,
    DryRun,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let mismatch = MigrateError::OrderMismatch {
            index: 1,
            expected: "0002_b.sql".to_string(),
            found: "0001_a.sql".to_string(),
        };
        assert_eq!(mismatch.code(), ErrorCode::Fs03);
        assert_eq!(
            mismatch.to_string(),
            "Expected migration 0002_b.sql but found 0001_a.sql at index 1"
        );
        assert!(mismatch.cause().is_none());

        let failed = MigrateError::Migration {
            filename: "0003_c.sql".to_string(),
            source: DbError::Other("syntax error".to_string()),
        };
        assert_eq!(failed.code(), ErrorCode::Db03);
        assert_eq!(failed.cause().as_deref(), Some("syntax error"));
    }

    #[test]
    fn test_missing_files_message() {
        let err = MigrateError::MissingFiles(vec!["a.sql".to_string(), "b.sql".to_string()]);
        assert_eq!(err.code(), ErrorCode::Fs02);
        assert_eq!(err.to_string(), "Missing previously run migration files: a.sql,b.sql");
    }

    #[test]
    fn test_retryable_codes() {
        assert!(ErrorCode::Db03.is_retryable());
        assert!(ErrorCode::Fs01.is_retryable());
        assert!(!ErrorCode::Fs02.is_retryable());
        assert!(!ErrorCode::Fs04.is_retryable());
    }

    #[test]
    fn test_result_json_shape() {
        let result = MigrationResult {
            success: false,
            message: "Contents of 0001_a.sql changed after migration was run; revert changes and try again".to_string(),
            count: 0,
            last_run: None,
            error: None,
            code: Some(ErrorCode::Fs04),
            pending: Vec::new(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "FS04");
        assert!(json["lastRun"].is_null());
        assert!(json.get("pending").is_none());

        let back: MigrationResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
