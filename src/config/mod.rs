use crate::utils::{DEFAULT_DIRECTORY, DEFAULT_TABLE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

fn default_directory() -> String {
    DEFAULT_DIRECTORY.to_string()
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

/// Migration runner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateConfig {
    /// Connection URL (`postgres://...` or `sqlite:...`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// Directory holding the `.sql` migration files
    #[serde(default = "default_directory")]
    pub directory: String,
    /// Bookkeeping table name
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            directory: default_directory(),
            table: default_table(),
        }
    }
}

impl MigrateConfig {
    /// Apply values given on the command line or in the environment
    pub fn with_overrides(
        mut self,
        database_url: Option<String>,
        directory: Option<String>,
        table: Option<String>,
    ) -> Self {
        if database_url.is_some() {
            self.database_url = database_url;
        }
        if let Some(directory) = directory {
            self.directory = directory;
        }
        if let Some(table) = table {
            self.table = table;
        }
        self
    }
}

/// Read the configuration file, if it exists
pub async fn read_config(config_path: &Path) -> Result<Option<MigrateConfig>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(config_path).await?;
    let config: MigrateConfig = serde_json::from_str(&content)?;
    Ok(Some(config))
}

/// Write the configuration file
pub async fn write_config(config_path: &Path, config: &MigrateConfig) -> Result<(), ConfigError> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(config_path, content).await?;
    Ok(())
}

/// Create the migrations directory and write the configuration file.
///
/// An existing configuration file is left untouched. Returns whether the file was written.
pub async fn init_project(config_path: &Path, config: &MigrateConfig) -> Result<bool, ConfigError> {
    fs::create_dir_all(&config.directory).await?;

    if config_path.exists() {
        return Ok(false);
    }

    write_config(config_path, config).await?;
    Ok(true)
}
