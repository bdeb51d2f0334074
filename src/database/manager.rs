use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::{DatabaseConfig, StorageBackend};
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;
use crate::database::repository::Repositories;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] MigrateError),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::ConnectionError(err.to_string())
            }
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                DatabaseError::UniqueViolation(db.message().to_string())
            }
            other => DatabaseError::Sqlx(other),
        }
    }
}

/// Open the configured backend and wrap it for the services
pub async fn connect(config: &DatabaseConfig) -> Result<Repositories, DatabaseError> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            Ok(Repositories::from_store(Arc::new(MemoryStore::new())))
        }
        StorageBackend::Postgres => {
            let pool = connect_pool(config).await?;
            migrate(&pool).await?;
            Ok(Repositories::from_store(Arc::new(PgStore::new(pool))))
        }
    }
}

/// Create the Postgres pool from `DATABASE_URL`
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let url = config
        .url
        .as_deref()
        .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(url)
        .await?;

    info!("Created database pool (max {} connections)", config.max_connections);
    Ok(pool)
}

/// Apply the embedded migrations under `migrations/`
pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
