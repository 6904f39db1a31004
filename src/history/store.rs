use super::types::AppliedRecord;
use crate::db::{DbError, QueryExecutor};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Plain or schema-qualified SQL identifier. The table name is spliced into
/// SQL text, so nothing else is accepted.
static TABLE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("table name pattern is valid")
});

/// Check that a table name is safe to interpolate into SQL
pub fn validate_table_name(table: &str) -> Result<(), DbError> {
    if TABLE_NAME.is_match(table) {
        Ok(())
    } else {
        Err(DbError::InvalidTableName(table.to_string()))
    }
}

/// Access to the bookkeeping table that records applied migrations
#[derive(Debug, Clone)]
pub struct HistoryStore {
    table: String,
}

impl HistoryStore {
    /// Create a store for the given table. Fails if the name is not a plain identifier.
    pub fn new(table: impl Into<String>) -> Result<Self, DbError> {
        let table = table.into();
        validate_table_name(&table)?;
        Ok(Self { table })
    }

    /// Create the bookkeeping table if it does not exist yet
    pub async fn ensure_table(&self, db: &mut dyn QueryExecutor) -> Result<(), DbError> {
        let sql = db.dialect().create_table_sql(&self.table);
        db.execute(&sql).await?;
        debug!(table = %self.table, "Bookkeeping table ready");
        Ok(())
    }

    /// All applied migrations, oldest first
    pub async fn list_applied(
        &self,
        db: &mut dyn QueryExecutor,
    ) -> Result<Vec<AppliedRecord>, DbError> {
        let sql = db.dialect().select_applied_sql(&self.table);
        let rows = db.query(&sql, &[]).await?;
        rows.iter().map(AppliedRecord::from_row).collect()
    }

    /// Append one entry. Must run inside the caller's open transaction.
    pub async fn record_applied(
        &self,
        db: &mut dyn QueryExecutor,
        filename: &str,
        checksum: &str,
    ) -> Result<(), DbError> {
        let sql = db.dialect().insert_applied_sql(&self.table);
        db.query(&sql, &[filename, checksum]).await?;
        Ok(())
    }
}
