//! Record store backends and the repository built on top of them.

pub mod memory;
pub mod repository;
pub mod run_index;
pub mod store;
pub mod test_method_results;

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

pub use memory::MemoryStore;
pub use repository::ResultRepository;
pub use run_index::RunIdPageQuery;
pub use store::{ResultFilter, ResultStore};

/// PostgreSQL connection pool wrapper.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new connection pool from configuration.
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        let mut options = ConnectOptions::new(config.connection_url());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        Ok(DbPool { conn })
    }

    /// Apply pending schema migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))
    }

    /// Get access to the connection for executing queries.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}

/// Open the store selected by `config.url`.
///
/// `memory://` gives a process-local store; anything else is treated as a
/// PostgreSQL URL and migrated before use.
pub async fn open_store(config: &DatabaseConfig) -> AppResult<Arc<dyn ResultStore>> {
    if config.is_memory() {
        info!("Using in-memory record store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = DbPool::new(config).await?;
    info!("Database connection established");

    pool.run_migrations().await?;
    info!("Database migrations complete");

    Ok(Arc::new(pool))
}
