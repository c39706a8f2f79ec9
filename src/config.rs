//! Paging configuration
//!
//! Defaults for the CLI, loaded from a YAML file. Command-line flags override
//! anything set here.

use crate::error::{Error, Result};
use crate::pagination::PageRequest;
use crate::query::Sort;
use crate::types::LogLevel;
use duckdb::Connection;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Database path that opens an in-memory DuckDB instance
pub const IN_MEMORY_DATABASE: &str = ":memory:";

// ============================================================================
// Paging Config
// ============================================================================

/// Paging defaults loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Rows per page
    #[serde(default = "default_page_size")]
    pub page_size: i32,

    /// Pages to probe after the target page
    #[serde(default)]
    pub lookahead_pages: i32,

    /// Fall back to the last page when the target page is past the data
    #[serde(default)]
    pub two_phase: bool,

    /// Sort applied to query sources
    #[serde(default)]
    pub sort: Option<Sort>,

    /// Query source
    #[serde(default)]
    pub source: Option<SourceConfig>,

    /// Log level for the CLI
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

fn default_page_size() -> i32 {
    20
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            lookahead_pages: 0,
            two_phase: false,
            sort: None,
            source: None,
            log_level: None,
        }
    }
}

impl PagingConfig {
    /// Check the configured values
    pub fn validate(&self) -> Result<()> {
        if self.page_size <= 0 {
            return Err(Error::config(format!(
                "page_size must be >= 1, current: {}",
                self.page_size
            )));
        }

        if self.lookahead_pages < 0 {
            return Err(Error::config(format!(
                "lookahead_pages must be >= 0, current: {}",
                self.lookahead_pages
            )));
        }

        if let Some(source) = &self.source {
            source.validate()?;
        }

        Ok(())
    }

    /// Build a request for `target_page` with the configured size and lookahead
    pub fn page_request(&self, target_page: i32) -> Result<PageRequest> {
        PageRequest::new(target_page, self.page_size, self.lookahead_pages)
    }
}

// ============================================================================
// Source Config
// ============================================================================

/// DuckDB query source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Database file, or `:memory:`
    #[serde(default = "default_database")]
    pub database: String,

    /// Base SELECT statement
    #[serde(default)]
    pub query: String,
}

fn default_database() -> String {
    IN_MEMORY_DATABASE.to_string()
}

impl SourceConfig {
    /// Check the source definition
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(Error::config("Source query cannot be empty"));
        }
        if self.database.trim().is_empty() {
            return Err(Error::config("Source database cannot be empty"));
        }
        Ok(())
    }

    /// Open the configured database
    pub fn open(&self) -> Result<Connection> {
        open_database(&self.database)
    }
}

/// Open a DuckDB database file, or an in-memory database for `:memory:`
pub fn open_database(database: &str) -> Result<Connection> {
    let conn = if database == IN_MEMORY_DATABASE {
        Connection::open_in_memory()?
    } else {
        Connection::open(database)?
    };
    Ok(conn)
}

// ============================================================================
// Loading
// ============================================================================

/// Load a paging config from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<PagingConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_config_from_str(&content)
}

/// Load a paging config from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<PagingConfig> {
    // An empty document means "all defaults"
    if yaml.trim().is_empty() {
        return Ok(PagingConfig::default());
    }

    let config: PagingConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}
