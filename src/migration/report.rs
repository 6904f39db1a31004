//! Turning a run's outcome into the [`MigrationResult`] handed to callers.

use super::types::{MigrateError, MigrationResult, RunMode};
use crate::reconciliation::ReconciliationOutcome;

/// Result for a run that failed before reconciliation started
pub fn failure(err: MigrateError) -> MigrationResult {
    from_outcome(
        "",
        RunMode::Apply,
        ReconciliationOutcome {
            failure: Some(err),
            ..Default::default()
        },
    )
}

/// Result for a finished or stopped reconciliation walk
pub fn from_outcome(
    directory: &str,
    mode: RunMode,
    outcome: ReconciliationOutcome,
) -> MigrationResult {
    let ReconciliationOutcome {
        applied,
        pending,
        failure,
    } = outcome;
    let count = applied.len();
    let last_run = applied.last().cloned();

    if let Some(err) = failure {
        return MigrationResult {
            success: false,
            message: err.to_string(),
            count,
            last_run,
            error: err.cause(),
            code: Some(err.code()),
            pending: Vec::new(),
        };
    }

    let message = match (mode, last_run.as_deref(), pending.first()) {
        (RunMode::Apply, Some(last), _) => {
            format!("Ran {count} new database migrations, ending with {last}")
        }
        (RunMode::DryRun, _, Some(first)) => format!(
            "Found {} new database migrations, starting with {first}",
            pending.len()
        ),
        _ => format!("No new database migrations found in directory: {directory}"),
    };

    MigrationResult {
        success: true,
        message,
        count,
        last_run,
        error: None,
        code: None,
        pending,
    }
}
