//! Migration runner: the entry point that ties the pieces together.

use super::report;
use super::types::{MigrateError, MigrationResult, RunMode};
use crate::db::{DbError, QueryExecutor};
use crate::history::{AppliedRecord, HistoryStore};
use crate::reconciliation::reconcile;
use crate::source::list_candidates;
use crate::utils::{DEFAULT_DIRECTORY, DEFAULT_TABLE};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Runs the migrations found in one directory against one database session.
///
/// A run:
/// 1. Creates the bookkeeping table if needed (`DB01`)
/// 2. Lists the migration files in the directory (`FS01`)
/// 3. Reads the applied history (`DB02`)
/// 4. Reconciles the two and applies whatever is new
///
/// Runs never return `Err`; every failure is reported in the [`MigrationResult`].
#[derive(Debug, Clone)]
pub struct Migrator {
    directory: PathBuf,
    table: String,
}

impl Migrator {
    /// Create a runner for `directory`, recording history in the default table.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// Use a different bookkeeping table.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Apply every new migration, in order, one transaction each.
    pub async fn run(&self, db: &mut dyn QueryExecutor) -> MigrationResult {
        self.execute(db, RunMode::Apply).await
    }

    /// Validate history and report pending migrations without running them.
    ///
    /// The bookkeeping table is still created if it is missing.
    pub async fn status(&self, db: &mut dyn QueryExecutor) -> MigrationResult {
        self.execute(db, RunMode::DryRun).await
    }

    async fn execute(&self, db: &mut dyn QueryExecutor, mode: RunMode) -> MigrationResult {
        let directory = self.directory.display().to_string();

        info!(directory = %directory, table = %self.table, ?mode, "Starting migration run");

        let (history, candidates, applied) = match self.prepare(db).await {
            Ok(prepared) => prepared,
            Err(err) => {
                error!(code = %err.code(), error = ?err.cause(), "{}", err);
                return report::failure(err);
            }
        };

        info!(
            candidates = candidates.len(),
            applied = applied.len(),
            "Loaded migration files and history"
        );

        let outcome = reconcile(db, &history, &self.directory, &candidates, &applied, mode).await;
        let result = report::from_outcome(&directory, mode, outcome);

        if result.success {
            info!(count = result.count, last_run = ?result.last_run, "{}", result.message);
        }

        result
    }

    async fn prepare(
        &self,
        db: &mut dyn QueryExecutor,
    ) -> Result<(HistoryStore, Vec<String>, Vec<AppliedRecord>), MigrateError> {
        let create_table_error = |source: DbError| MigrateError::CreateTable {
            table: self.table.clone(),
            source,
        };

        let history = HistoryStore::new(&self.table).map_err(create_table_error)?;
        history.ensure_table(db).await.map_err(create_table_error)?;

        let candidates =
            list_candidates(&self.directory)
                .await
                .map_err(|source| MigrateError::ReadDirectory {
                    directory: self.directory.display().to_string(),
                    source,
                })?;

        let applied = history
            .list_applied(db)
            .await
            .map_err(|source| MigrateError::QueryHistory {
                table: self.table.clone(),
                source,
            })?;

        Ok((history, candidates, applied))
    }
}

impl Default for Migrator {
    fn default() -> Self {
        Self::new(DEFAULT_DIRECTORY)
    }
}

/// Apply new migrations from `directory`, recording history in the `migrations` table.
pub async fn migrate(db: &mut dyn QueryExecutor, directory: impl AsRef<Path>) -> MigrationResult {
    Migrator::new(directory.as_ref()).run(db).await
}

/// Apply new migrations from `directory`, recording history in `table`.
pub async fn migrate_with_table(
    db: &mut dyn QueryExecutor,
    directory: impl AsRef<Path>,
    table: &str,
) -> MigrationResult {
    Migrator::new(directory.as_ref()).table(table).run(db).await
}
