//! Bookkeeping of applied migrations.
//!
//! The history table is append-only: entries are inserted inside the
//! transaction that ran the migration and are never updated or deleted.

mod store;
mod types;

pub use store::{validate_table_name, HistoryStore};
pub use types::AppliedRecord;
