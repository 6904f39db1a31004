//! SQLite session adapter

use super::{text_row, DbError, Dialect, QueryExecutor, QueryRow};
use async_trait::async_trait;
use sqlx::{Connection, SqliteConnection};

/// SQLite session
///
/// `sqlite::memory:` gives each executor its own private database.
pub struct SqliteExecutor {
    conn: SqliteConnection,
}

impl SqliteExecutor {
    /// Open a new session
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let conn = SqliteConnection::connect(url).await?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database
    pub async fn in_memory() -> Result<Self, DbError> {
        Self::connect("sqlite::memory:").await
    }
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn execute(&mut self, sql: &str) -> Result<(), DbError> {
        // A bare &str runs through the simple-query path, so multi-statement files work
        sqlx::Executor::execute(&mut self.conn, sql).await?;
        Ok(())
    }

    async fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<QueryRow>, DbError> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(param.to_string());
        }

        let rows = query.fetch_all(&mut self.conn).await?;
        rows.iter().map(text_row).collect()
    }
}
