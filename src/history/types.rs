use crate::db::{DbError, QueryRow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One previously applied migration, as recorded in the history table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedRecord {
    pub filename: String,
    pub checksum: String,
    /// When the migration was committed. Absent if the backend did not report it.
    pub applied_at: Option<DateTime<Utc>>,
}

impl AppliedRecord {
    pub fn new(filename: impl Into<String>, checksum: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            checksum: checksum.into(),
            applied_at: None,
        }
    }

    /// Build a record from a history row (`filename`, `checksum`, optional `applied_at`)
    pub fn from_row(row: &QueryRow) -> Result<Self, DbError> {
        let column = |name: &str| {
            row.get(name)
                .cloned()
                .ok_or_else(|| DbError::MissingColumn(name.to_string()))
        };

        let applied_at = row
            .get("applied_at")
            .map(|value| {
                DateTime::parse_from_rfc3339(value)
                    .map(|t| t.with_timezone(&Utc))
                    .map_err(|_| DbError::InvalidTimestamp {
                        column: "applied_at".to_string(),
                        value: value.clone(),
                    })
            })
            .transpose()?;

        Ok(Self {
            filename: column("filename")?,
            checksum: column("checksum")?,
            applied_at,
        })
    }
}
