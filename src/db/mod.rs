//! Database access for the migration runner.
//!
//! The runner only needs a narrow capability from the database: run raw SQL,
//! run one parameterized statement and read back text columns, and open,
//! commit or roll back a transaction. [`QueryExecutor`] captures exactly that,
//! and the sqlx-backed adapters in this module implement it for PostgreSQL
//! and SQLite.
//!
//! An executor wraps a single session. Transactions are issued as plain
//! `BEGIN`/`COMMIT`/`ROLLBACK` statements, so a pooled handle that may hand
//! each statement to a different connection must not be used here.

mod dialect;
mod postgres;
mod sqlite;

pub use dialect::Dialect;
pub use postgres::PgExecutor;
pub use sqlite::SqliteExecutor;

use async_trait::async_trait;
use sqlx::{Column, Row};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    #[error("Unsupported database URL scheme: {0}")]
    UnsupportedUrl(String),

    #[error("Column {0} missing from result row")]
    MissingColumn(String),

    #[error("Invalid timestamp {value:?} in column {column}")]
    InvalidTimestamp { column: String, value: String },

    #[error("{0}")]
    Other(String),
}

/// One result row, keyed by column name. NULL columns are absent.
pub type QueryRow = HashMap<String, String>;

/// The query capability the migration runner needs from a database session.
#[async_trait]
pub trait QueryExecutor: Send {
    /// SQL dialect spoken by this session.
    fn dialect(&self) -> Dialect;

    /// Execute raw SQL text as-is. The text may hold several statements.
    async fn execute(&mut self, sql: &str) -> Result<(), DbError>;

    /// Execute a single statement with text parameters and return its rows.
    async fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<QueryRow>, DbError>;

    async fn begin(&mut self) -> Result<(), DbError> {
        self.execute("BEGIN").await
    }

    async fn commit(&mut self) -> Result<(), DbError> {
        self.execute("COMMIT").await
    }

    async fn rollback(&mut self) -> Result<(), DbError> {
        self.execute("ROLLBACK").await
    }
}

/// Open a session for the given URL, choosing the adapter from its scheme.
pub async fn connect(url: &str) -> Result<Box<dyn QueryExecutor>, DbError> {
    match Dialect::from_url(url) {
        Some(Dialect::Postgres) => Ok(Box::new(PgExecutor::connect(url).await?)),
        Some(Dialect::Sqlite) => Ok(Box::new(SqliteExecutor::connect(url).await?)),
        // Only the scheme is reported; the rest of the URL may carry credentials.
        None => Err(DbError::UnsupportedUrl(
            url.split(':').next().unwrap_or_default().to_string(),
        )),
    }
}

/// Decode every column of a row as nullable text.
pub(crate) fn text_row<R>(row: &R) -> Result<QueryRow, DbError>
where
    R: Row,
    usize: sqlx::ColumnIndex<R>,
    for<'r> Option<String>: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
{
    let mut values = QueryRow::new();
    for (index, column) in row.columns().iter().enumerate() {
        let value: Option<String> = row.try_get(index)?;
        if let Some(value) = value {
            values.insert(column.name().to_string(), value);
        }
    }
    Ok(values)
}
