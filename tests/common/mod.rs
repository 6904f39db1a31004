#![allow(dead_code)]

use async_trait::async_trait;
use sqlmigrate::{DbError, Dialect, QueryExecutor, QueryRow, SqliteExecutor};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const FILMS: &str = "0001_create-table-films.sql";
pub const DISTRIBUTORS: &str = "0002_create-table-distributors.sql";
pub const CINEMAS: &str = "0003_create-table-cinemas.sql";

pub const FILMS_SQL: &str = "CREATE TABLE films (
    code        TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    did         INTEGER NOT NULL,
    date_prod   TEXT,
    kind        TEXT
);
";

pub const DISTRIBUTORS_SQL: &str = "CREATE TABLE distributors (
    did     INTEGER PRIMARY KEY,
    name    TEXT NOT NULL
);
INSERT INTO distributors (did, name) VALUES (1, 'Westward');
";

pub const CINEMAS_SQL: &str = "CREATE TABLE cinemas (
    id        INTEGER PRIMARY KEY,
    name      TEXT NOT NULL,
    location  TEXT
);
";

/// Helper to create a temporary migrations directory
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write one migration file
pub fn write_migration(dir: &Path, filename: &str, sql: &str) {
    fs::write(dir.join(filename), sql).expect("Failed to write migration");
}

/// Directory with the films and distributors migrations
pub fn films_and_distributors() -> TempDir {
    let dir = create_test_dir();
    write_migration(dir.path(), FILMS, FILMS_SQL);
    write_migration(dir.path(), DISTRIBUTORS, DISTRIBUTORS_SQL);
    dir
}

/// Fresh private in-memory database
pub async fn memory_db() -> SqliteExecutor {
    SqliteExecutor::in_memory()
        .await
        .expect("Failed to open in-memory database")
}

/// User tables in the database, sorted
pub async fn table_names(db: &mut dyn QueryExecutor) -> Vec<String> {
    db.query(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        &[],
    )
    .await
    .expect("Failed to list tables")
    .into_iter()
    .filter_map(|row| row.get("name").cloned())
    .collect()
}

/// `(filename, checksum)` pairs from a history table, in application order
pub async fn history_rows(db: &mut dyn QueryExecutor, table: &str) -> Vec<(String, String)> {
    let sql = format!("SELECT filename, checksum FROM {table} ORDER BY created_at, id");
    db.query(&sql, &[])
        .await
        .expect("Failed to read history")
        .into_iter()
        .map(|row| (row["filename"].clone(), row["checksum"].clone()))
        .collect()
}

/// Executor that records every statement and fails those starting with a given prefix
pub struct FaultyExecutor {
    inner: SqliteExecutor,
    fail_prefix: Option<String>,
    pub statements: Vec<String>,
}

impl FaultyExecutor {
    pub fn new(inner: SqliteExecutor) -> Self {
        Self {
            inner,
            fail_prefix: None,
            statements: Vec::new(),
        }
    }

    pub fn fail_on(mut self, prefix: &str) -> Self {
        self.fail_prefix = Some(prefix.to_string());
        self
    }

    pub fn inner(&mut self) -> &mut SqliteExecutor {
        &mut self.inner
    }

    fn check(&mut self, sql: &str) -> Result<(), DbError> {
        self.statements.push(sql.trim().to_string());
        match &self.fail_prefix {
            Some(prefix) if sql.trim_start().starts_with(prefix.as_str()) => {
                Err(DbError::Other(format!("injected failure: {prefix}")))
            }
            _ => Ok(()),
        }
    }

    pub fn ran(&self, prefix: &str) -> bool {
        self.statements.iter().any(|s| s.starts_with(prefix))
    }
}

#[async_trait]
impl QueryExecutor for FaultyExecutor {
    fn dialect(&self) -> Dialect {
        self.inner.dialect()
    }

    async fn execute(&mut self, sql: &str) -> Result<(), DbError> {
        self.check(sql)?;
        self.inner.execute(sql).await
    }

    async fn query(&mut self, sql: &str, params: &[&str]) -> Result<Vec<QueryRow>, DbError> {
        self.check(sql)?;
        self.inner.query(sql, params).await
    }
}
