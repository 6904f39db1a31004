//! Forward-only SQL migrations.
//!
//! This module is the public face of the crate: it runs the migration files
//! of one directory against a database session and reports what happened.
//!
//! # Overview
//!
//! - Migration files are the `.sql` files of a directory, ordered by name
//! - Applied migrations are recorded with a checksum of their content
//! - Recorded history must remain an exact prefix of the files on disk;
//!   a deleted, reordered or edited applied file stops the run
//! - Each new migration runs in its own transaction together with its history entry
//!
//! # Usage
//!
//! ```ignore
//! let mut db = SqliteExecutor::connect("sqlite://app.db").await?;
//! let result = migrate(&mut db, "migrations").await;
//! if !result.success {
//!     eprintln!("{} ({:?})", result.message, result.code);
//! }
//! ```

mod executor;
mod report;
mod types;

pub use executor::{migrate, migrate_with_table, Migrator};
pub use types::{ErrorCode, MigrateError, MigrationResult, RunMode};
