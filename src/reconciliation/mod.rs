mod execute;
mod plan;

pub use execute::{reconcile, ReconciliationOutcome};
pub use plan::{check_checksum, check_position, find_missing, step_at, Step};
