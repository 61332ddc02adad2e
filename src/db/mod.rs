mod error;
pub mod repos;
#[cfg(feature = "database-sqlite")]
pub mod sqlite;

#[cfg(all(test, feature = "database-sqlite"))]
pub mod tests;

use std::sync::Arc;

pub use error::{DbError, DbResult};
pub use repos::*;

use crate::config::DatabaseConfig;

/// Repository trait objects, built once when the pool is created.
struct CachedRepos {
    tenants: Arc<dyn TenantRepo>,
    users: Arc<dyn UserRepo>,
    bots: Arc<dyn BotRepo>,
    bot_grants: Arc<dyn BotGrantRepo>,
    conversations: Arc<dyn ConversationRepo>,
    knowledge_bases: Arc<dyn KnowledgeBaseRepo>,
}

enum PoolStorage {
    #[cfg(feature = "database-sqlite")]
    Sqlite(sqlx::SqlitePool),
    #[cfg(not(feature = "database-sqlite"))]
    _None(std::convert::Infallible),
}

/// Facade over the storage backend.
///
/// Hands out `Arc<dyn Repo>` objects cached at construction, so access
/// sites never allocate.
pub struct DbPool {
    inner: PoolStorage,
    repos: CachedRepos,
}

impl DbPool {
    /// Wrap an already-open SQLite pool. The test harness uses this to
    /// run against in-memory databases.
    #[cfg(feature = "database-sqlite")]
    pub fn from_sqlite(pool: sqlx::SqlitePool) -> Self {
        let repos = CachedRepos {
            tenants: Arc::new(sqlite::SqliteTenantRepo::new(pool.clone())),
            users: Arc::new(sqlite::SqliteUserRepo::new(pool.clone())),
            bots: Arc::new(sqlite::SqliteBotRepo::new(pool.clone())),
            bot_grants: Arc::new(sqlite::SqliteBotGrantRepo::new(pool.clone())),
            conversations: Arc::new(sqlite::SqliteConversationRepo::new(pool.clone())),
            knowledge_bases: Arc::new(sqlite::SqliteKnowledgeBaseRepo::new(pool.clone())),
        };
        DbPool {
            inner: PoolStorage::Sqlite(pool),
            repos,
        }
    }

    /// Open the backend named by the configuration.
    pub async fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        match config {
            DatabaseConfig::None => Err(DbError::NotConfigured),
            #[cfg(feature = "database-sqlite")]
            DatabaseConfig::Sqlite(cfg) => {
                let pool = sqlx::sqlite::SqlitePoolOptions::new()
                    .max_connections(cfg.max_connections)
                    .connect_with(
                        sqlx::sqlite::SqliteConnectOptions::new()
                            .filename(&cfg.path)
                            .create_if_missing(cfg.create_if_missing)
                            .journal_mode(if cfg.wal_mode {
                                sqlx::sqlite::SqliteJournalMode::Wal
                            } else {
                                sqlx::sqlite::SqliteJournalMode::Delete
                            })
                            .busy_timeout(std::time::Duration::from_millis(cfg.busy_timeout_ms)),
                    )
                    .await?;

                Ok(Self::from_sqlite(pool))
            }
        }
    }

    /// Apply pending migrations. sqlx tracks applied versions in its own
    /// bookkeeping table.
    pub async fn run_migrations(&self) -> DbResult<()> {
        match &self.inner {
            #[cfg(feature = "database-sqlite")]
            PoolStorage::Sqlite(pool) => {
                tracing::info!("Applying tenancy schema migrations");
                sqlx::migrate!("./migrations_sqlx/sqlite").run(pool).await?;
                tracing::info!("Schema is up to date");
                Ok(())
            }
            #[cfg(not(feature = "database-sqlite"))]
            PoolStorage::_None(infallible) => match *infallible {},
        }
    }

    pub fn tenants(&self) -> Arc<dyn TenantRepo> {
        Arc::clone(&self.repos.tenants)
    }

    pub fn users(&self) -> Arc<dyn UserRepo> {
        Arc::clone(&self.repos.users)
    }

    pub fn bots(&self) -> Arc<dyn BotRepo> {
        Arc::clone(&self.repos.bots)
    }

    pub fn bot_grants(&self) -> Arc<dyn BotGrantRepo> {
        Arc::clone(&self.repos.bot_grants)
    }

    pub fn conversations(&self) -> Arc<dyn ConversationRepo> {
        Arc::clone(&self.repos.conversations)
    }

    pub fn knowledge_bases(&self) -> Arc<dyn KnowledgeBaseRepo> {
        Arc::clone(&self.repos.knowledge_bases)
    }

    /// Verify the backend is reachable.
    pub async fn health_check(&self) -> DbResult<()> {
        match &self.inner {
            #[cfg(feature = "database-sqlite")]
            PoolStorage::Sqlite(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            #[cfg(not(feature = "database-sqlite"))]
            PoolStorage::_None(infallible) => match *infallible {},
        }
    }
}
