//! Storage implementations.

use std::sync::Arc;

use tracing::info;

use crate::config::{StorageConfig, StorageType};
use crate::interfaces::{EventStore, Result, SnapshotStore, SubscriptionStore};

pub mod schema;
pub mod sql;

#[cfg(test)]
pub mod mock;

#[cfg(feature = "postgres")]
pub use sql::postgres::{PostgresEventStore, PostgresSnapshotStore, PostgresSubscriptionStore};

#[cfg(feature = "sqlite")]
pub use sql::sqlite::{SqliteEventStore, SqliteSnapshotStore, SqliteSubscriptionStore};

/// The stores backing one quill instance, sharing a pool.
pub type Stores = (
    Arc<dyn EventStore>,
    Arc<dyn SnapshotStore>,
    Arc<dyn SubscriptionStore>,
);

/// Initialize storage based on configuration.
///
/// Connects the backend pool, creates the schema if needed, and returns the
/// event, snapshot, and subscription stores sharing that pool.
pub async fn init_storage(config: &StorageConfig) -> Result<Stores> {
    match config.storage_type {
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            info!(path = %config.sqlite.path, "Storage: sqlite");

            let pool = if config.sqlite.path == ":memory:" {
                // A pooled in-memory database would hand each connection its
                // own empty database; pin the pool to one connection.
                sqlx::sqlite::SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect("sqlite::memory:")
                    .await?
            } else {
                if let Some(parent) = std::path::Path::new(&config.sqlite.path).parent() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        crate::interfaces::StorageError::Unavailable(sqlx::Error::Io(e))
                    })?;
                }
                sqlx::SqlitePool::connect(&format!("sqlite:{}?mode=rwc", config.sqlite.path))
                    .await?
            };

            let event_store = Arc::new(SqliteEventStore::new(pool.clone()));
            event_store.init().await?;

            let snapshot_store = Arc::new(SqliteSnapshotStore::new(pool.clone()));
            let subscription_store = Arc::new(SqliteSubscriptionStore::new(pool));

            Ok((event_store, snapshot_store, subscription_store))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageType::Sqlite => Err(crate::interfaces::StorageError::RecoveryFailed(
            "sqlite storage requested but the 'sqlite' feature is not enabled".to_string(),
        )),
        #[cfg(feature = "postgres")]
        StorageType::Postgres => {
            info!("Storage: postgres");

            let pool = sqlx::PgPool::connect(&config.postgres.uri).await?;

            let event_store = Arc::new(PostgresEventStore::new(pool.clone()));
            event_store.init().await?;

            let snapshot_store = Arc::new(PostgresSnapshotStore::new(pool.clone()));
            let subscription_store = Arc::new(PostgresSubscriptionStore::new(pool));

            Ok((event_store, snapshot_store, subscription_store))
        }
        #[cfg(not(feature = "postgres"))]
        StorageType::Postgres => Err(crate::interfaces::StorageError::RecoveryFailed(
            "postgres storage requested but the 'postgres' feature is not enabled".to_string(),
        )),
    }
}
