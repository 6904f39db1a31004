//! The reconciliation walk.
//!
//! Candidates are visited strictly in order. Each index either matches
//! recorded history and is skipped, diverges from it and ends the walk, or
//! lies past history and is applied in its own transaction. The walk stops
//! at the first failure of any kind; migrations committed before that point
//! stay committed.

use super::plan::{check_checksum, check_position, find_missing, step_at, Step};
use crate::db::{DbError, QueryExecutor};
use crate::history::{AppliedRecord, HistoryStore};
use crate::migration::{MigrateError, RunMode};
use crate::source::{read_content, read_migration, MigrationFile};
use crate::utils::compute_hash;
use std::path::Path;
use tracing::{debug, error, info};

/// Everything the walk did before it finished or stopped
#[derive(Debug, Default)]
pub struct ReconciliationOutcome {
    /// Migrations committed by this walk, in order
    pub applied: Vec<String>,
    /// New migrations that were found but not run (dry runs)
    pub pending: Vec<String>,
    /// The failure that stopped the walk, if any
    pub failure: Option<MigrateError>,
}

impl ReconciliationOutcome {
    fn fail(mut self, err: MigrateError) -> Self {
        self.failure = Some(err);
        self
    }
}

/// Reconcile `candidates` against `applied` history and run what is new
pub async fn reconcile(
    db: &mut dyn QueryExecutor,
    history: &HistoryStore,
    directory: &Path,
    candidates: &[String],
    applied: &[AppliedRecord],
    mode: RunMode,
) -> ReconciliationOutcome {
    let outcome = ReconciliationOutcome::default();

    let missing = find_missing(candidates, applied);
    if !missing.is_empty() {
        error!(missing = ?missing, "Previously run migration files are missing");
        return outcome.fail(MigrateError::MissingFiles(missing));
    }

    walk(db, history, directory, candidates, applied, mode, outcome).await
}

async fn walk(
    db: &mut dyn QueryExecutor,
    history: &HistoryStore,
    directory: &Path,
    candidates: &[String],
    applied: &[AppliedRecord],
    mode: RunMode,
    mut outcome: ReconciliationOutcome,
) -> ReconciliationOutcome {
    for (index, filename) in candidates.iter().enumerate() {
        match step_at(index, applied) {
            Step::Verify(previous) => {
                if let Err(err) = verify_applied(directory, index, filename, previous).await {
                    error!(migration = %filename, index, code = %err.code(), "{}", err);
                    return outcome.fail(err);
                }
                debug!(migration = %filename, "Already applied");
            }
            Step::Apply if mode == RunMode::DryRun => {
                outcome.pending.push(filename.clone());
            }
            Step::Apply => {
                let migration = match read_migration(directory, filename).await {
                    Ok(migration) => migration,
                    Err(source) => {
                        error!(migration = %filename, error = %source, "Failed to read migration");
                        return outcome.fail(MigrateError::ReadFile {
                            filename: filename.clone(),
                            source,
                        })
                    }
                };

                info!(migration = %filename, "Applying migration");

                if let Err(source) = apply_migration(db, history, &migration).await {
                    error!(migration = %filename, error = %source, "Migration failed");
                    return outcome.fail(MigrateError::Migration {
                        filename: filename.clone(),
                        source,
                    });
                }

                info!(migration = %filename, "Migration applied");
                outcome.applied.push(filename.clone());
            }
        }
    }

    outcome
}

/// Check a candidate that sits inside recorded history.
///
/// The name is compared first so content is only read when it can matter.
async fn verify_applied(
    directory: &Path,
    index: usize,
    filename: &str,
    previous: &AppliedRecord,
) -> Result<(), MigrateError> {
    check_position(index, filename, previous)?;

    let content = read_content(directory, filename)
        .await
        .map_err(|source| MigrateError::ReadFile {
            filename: filename.to_string(),
            source,
        })?;

    check_checksum(filename, &compute_hash(&content), previous)
}

/// Run one migration and record it in a single transaction.
async fn apply_migration(
    db: &mut dyn QueryExecutor,
    history: &HistoryStore,
    migration: &MigrationFile,
) -> Result<(), DbError> {
    db.begin().await?;

    if let Err(err) = run_in_transaction(db, history, migration).await {
        if let Err(rollback_err) = db.rollback().await {
            error!(
                migration = %migration.filename,
                error = %rollback_err,
                "Rollback failed"
            );
        }
        return Err(err);
    }

    Ok(())
}

async fn run_in_transaction(
    db: &mut dyn QueryExecutor,
    history: &HistoryStore,
    migration: &MigrationFile,
) -> Result<(), DbError> {
    db.execute(&migration.content).await?;
    history
        .record_applied(db, &migration.filename, &migration.checksum())
        .await?;
    db.commit().await
}
