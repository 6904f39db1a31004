//! Discovery and loading of migration files.
//!
//! Candidates are the regular entries of a single directory (no recursion)
//! whose names end in `.sql`, compared case-insensitively. They are ordered
//! by byte-wise comparison of their names, so zero-padded numeric prefixes
//! sort as intended.

use crate::utils::{compute_hash, MIGRATION_EXTENSION};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::warn;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read migrations directory {path}: {source}")]
    Directory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Failed to read migration file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A migration file loaded from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    pub filename: String,
    pub content: String,
}

impl MigrationFile {
    /// Fingerprint of the raw content, as stored in the history table
    pub fn checksum(&self) -> String {
        compute_hash(&self.content)
    }
}

/// Whether a file name is recognized as a migration
pub fn is_migration_file(filename: &str) -> bool {
    filename
        .to_ascii_lowercase()
        .ends_with(MIGRATION_EXTENSION)
}

/// List migration filenames in `directory`, sorted
pub async fn list_candidates(directory: &Path) -> Result<Vec<String>, SourceError> {
    let metadata = fs::metadata(directory)
        .await
        .map_err(|source| SourceError::Directory {
            path: directory.display().to_string(),
            source,
        })?;
    if !metadata.is_dir() {
        return Err(SourceError::NotADirectory(directory.display().to_string()));
    }

    let mut candidates = Vec::new();

    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| SourceError::Directory {
            path: directory.display().to_string(),
            source: e.into(),
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        let Some(filename) = entry.file_name().to_str() else {
            warn!(
                file = %entry.path().display(),
                "Skipping migration candidate with a non UTF-8 name"
            );
            continue;
        };

        if is_migration_file(filename) {
            candidates.push(filename.to_string());
        }
    }

    candidates.sort();
    Ok(candidates)
}

/// Read the raw text of one migration
pub async fn read_content(directory: &Path, filename: &str) -> Result<String, SourceError> {
    let path = directory.join(filename);
    fs::read_to_string(&path)
        .await
        .map_err(|source| SourceError::File {
            path: path.display().to_string(),
            source,
        })
}

/// Read one migration into a [`MigrationFile`]
pub async fn read_migration(directory: &Path, filename: &str) -> Result<MigrationFile, SourceError> {
    let content = read_content(directory, filename).await?;
    Ok(MigrationFile {
        filename: filename.to_string(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir, write};
    use tempfile::TempDir;

    #[test]
    fn test_is_migration_file() {
        assert!(is_migration_file("0001_create.sql"));
        assert!(is_migration_file("0002_UPPER.SQL"));
        assert!(is_migration_file("0003_mixed.Sql"));
        assert!(!is_migration_file("README.md"));
        assert!(!is_migration_file("0004.sql.bak"));
        assert!(!is_migration_file("sql"));
    }

    #[tokio::test]
    async fn test_list_candidates_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        for name in [
            "0010_later.sql",
            "0002_second.SQL",
            "0001_first.sql",
            "notes.txt",
            "0003_draft.sql.orig",
        ] {
            write(dir.join(name), "SELECT 1;").unwrap();
        }
        create_dir(dir.join("0005_folder.sql")).unwrap();

        let candidates = list_candidates(dir).await.unwrap();
        assert_eq!(
            candidates,
            vec!["0001_first.sql", "0002_second.SQL", "0010_later.sql"]
        );
    }

    #[tokio::test]
    async fn test_list_candidates_is_bytewise() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        for name in ["b.sql", "C.sql", "a.sql", "_x.sql"] {
            write(dir.join(name), "").unwrap();
        }

        let candidates = list_candidates(dir).await.unwrap();
        assert_eq!(candidates, vec!["C.sql", "_x.sql", "a.sql", "b.sql"]);
    }

    #[tokio::test]
    async fn test_list_candidates_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(list_candidates(temp_dir.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_candidates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = list_candidates(&temp_dir.path().join("nope")).await;
        assert!(matches!(result, Err(SourceError::Directory { .. })));
    }

    #[tokio::test]
    async fn test_list_candidates_on_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("0001.sql");
        write(&file, "").unwrap();

        let result = list_candidates(&file).await;
        assert!(matches!(result, Err(SourceError::NotADirectory(_))));
    }

    #[tokio::test]
    async fn test_read_migration() {
        let temp_dir = TempDir::new().unwrap();
        let sql = "CREATE TABLE films (id INTEGER PRIMARY KEY);\n";
        write(temp_dir.path().join("0001_films.sql"), sql).unwrap();

        let migration = read_migration(temp_dir.path(), "0001_films.sql")
            .await
            .unwrap();
        assert_eq!(migration.filename, "0001_films.sql");
        assert_eq!(migration.content, sql);
        assert_eq!(migration.checksum(), compute_hash(sql));
    }

    #[tokio::test]
    async fn test_read_missing_migration() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_content(temp_dir.path(), "0001_gone.sql").await;
        assert!(matches!(result, Err(SourceError::File { .. })));
    }
}
