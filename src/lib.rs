pub mod config;
pub mod db;
pub mod history;
pub mod migration;
pub mod reconciliation;
pub mod source;
pub mod utils;

// Re-export commonly used types
pub use config::{init_project, read_config, write_config, ConfigError, MigrateConfig};
pub use db::{connect, DbError, Dialect, PgExecutor, QueryExecutor, QueryRow, SqliteExecutor};
pub use history::{AppliedRecord, HistoryStore};
pub use migration::{
    migrate, migrate_with_table, ErrorCode, MigrateError, MigrationResult, Migrator, RunMode,
};
pub use source::{list_candidates, read_content, MigrationFile, SourceError};
pub use utils::compute_hash;
