//! Pure checks that decide what happens at each position of the walk.

use crate::history::AppliedRecord;
use crate::migration::MigrateError;
use std::collections::HashSet;

/// What the walk must do with the candidate at one index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<'a> {
    /// The index is inside recorded history; the candidate must match this record.
    Verify(&'a AppliedRecord),
    /// The index is past recorded history; the candidate is new.
    Apply,
}

/// Applied filenames that no longer exist among the candidates, in history order
pub fn find_missing(candidates: &[String], applied: &[AppliedRecord]) -> Vec<String> {
    let present: HashSet<&str> = candidates.iter().map(String::as_str).collect();
    applied
        .iter()
        .filter(|record| !present.contains(record.filename.as_str()))
        .map(|record| record.filename.clone())
        .collect()
}

/// Classify the candidate at `index`
pub fn step_at(index: usize, applied: &[AppliedRecord]) -> Step<'_> {
    match applied.get(index) {
        Some(record) => Step::Verify(record),
        None => Step::Apply,
    }
}

/// The candidate at `index` must carry the same name as the record applied there
pub fn check_position(
    index: usize,
    filename: &str,
    previous: &AppliedRecord,
) -> Result<(), MigrateError> {
    if filename == previous.filename {
        Ok(())
    } else {
        Err(MigrateError::OrderMismatch {
            index,
            expected: previous.filename.clone(),
            found: filename.to_string(),
        })
    }
}

/// The candidate's content must still produce the recorded checksum
pub fn check_checksum(
    filename: &str,
    checksum: &str,
    previous: &AppliedRecord,
) -> Result<(), MigrateError> {
    if checksum == previous.checksum {
        Ok(())
    } else {
        Err(MigrateError::ChecksumMismatch {
            filename: filename.to_string(),
        })
    }
}
