//! PostgreSQL session adapter

use super::{text_row, DbError, Dialect, QueryExecutor, QueryRow};
use async_trait::async_trait;
use sqlx::{Connection, PgConnection};

/// PostgreSQL session
pub struct PgExecutor {
    conn: PgConnection,
}

impl PgExecutor {
    /// Open a new session
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let conn = PgConnection::connect(url).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
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
