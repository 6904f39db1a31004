mod hash;

pub use hash::compute_hash;

/// Default name of the bookkeeping table
pub const DEFAULT_TABLE: &str = "migrations";

/// Default migrations directory, relative to the working directory
pub const DEFAULT_DIRECTORY: &str = "migrations";

/// Suffix recognized as a migration file (compared case-insensitively)
pub const MIGRATION_EXTENSION: &str = ".sql";
