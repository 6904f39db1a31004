//! SQL text for the bookkeeping table, per database dialect.

/// SQL dialect of a database session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Infer the dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Self::Postgres)
        } else if url.starts_with("sqlite:") {
            Some(Self::Sqlite)
        } else {
            None
        }
    }

    /// Idempotent DDL for the bookkeeping table.
    pub fn create_table_sql(&self, table: &str) -> String {
        match self {
            Self::Postgres => format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id          UUID         PRIMARY KEY DEFAULT gen_random_uuid(),
                    filename    TEXT         UNIQUE NOT NULL,
                    checksum    TEXT         NOT NULL,
                    created_at  TIMESTAMPTZ  NOT NULL DEFAULT now()
                )"
            ),
            Self::Sqlite => format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id          INTEGER  PRIMARY KEY AUTOINCREMENT,
                    filename    TEXT     UNIQUE NOT NULL,
                    checksum    TEXT     NOT NULL,
                    created_at  TEXT     NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                )"
            ),
        }
    }

    /// Applied history in application order. `applied_at` is RFC 3339 text in UTC.
    pub fn select_applied_sql(&self, table: &str) -> String {
        match self {
            Self::Postgres => format!(
                "SELECT filename, checksum, \
                 to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD\"T\"HH24:MI:SS.US\"Z\"') AS applied_at \
                 FROM {table} ORDER BY created_at"
            ),
            // Several inserts can share a millisecond; the rowid keeps them in order.
            Self::Sqlite => format!(
                "SELECT filename, checksum, created_at AS applied_at \
                 FROM {table} ORDER BY created_at, id"
            ),
        }
    }

    /// Parameterized insert of one history entry: `(filename, checksum)`.
    pub fn insert_applied_sql(&self, table: &str) -> String {
        match self {
            Self::Postgres => format!("INSERT INTO {table} (filename, checksum) VALUES ($1, $2)"),
            Self::Sqlite => format!("INSERT INTO {table} (filename, checksum) VALUES (?1, ?2)"),
        }
    }
}
