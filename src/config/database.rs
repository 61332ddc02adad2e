use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Where tenants, users, bots, grants, and the bot-owned child entities
/// are persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub enum DatabaseConfig {
    /// No storage backend. The pure decision functions still work; any
    /// repository call fails with `NotConfigured`.
    #[default]
    None,

    /// Single-file SQLite backend.
    #[cfg(feature = "database-sqlite")]
    Sqlite(SqliteConfig),
}

impl DatabaseConfig {
    pub fn is_none(&self) -> bool {
        matches!(self, DatabaseConfig::None)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            DatabaseConfig::None => Ok(()),
            #[cfg(feature = "database-sqlite")]
            DatabaseConfig::Sqlite(c) => c.validate(),
        }
    }
}

/// SQLite backend settings.
///
/// `:memory:` as the path gives a throwaway in-memory database, which the
/// test suite relies on.
#[cfg(feature = "database-sqlite")]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteConfig {
    /// Database file path.
    pub path: String,

    /// Create the file on first open.
    #[serde(default = "default_true")]
    pub create_if_missing: bool,

    /// Apply pending migrations at startup.
    #[serde(default = "default_true")]
    pub run_migrations: bool,

    /// Write-ahead logging, for concurrent readers.
    #[serde(default = "default_true")]
    pub wal_mode: bool,

    /// How long a writer waits on a locked database before giving up.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Connection pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[cfg(feature = "database-sqlite")]
impl SqliteConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.path.is_empty() {
            return Err(ConfigError::Validation(
                "SQLite path cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(feature = "database-sqlite")]
fn default_true() -> bool {
    true
}

#[cfg(feature = "database-sqlite")]
fn default_busy_timeout_ms() -> u64 {
    5000
}

#[cfg(feature = "database-sqlite")]
fn default_max_connections() -> u32 {
    5
}
