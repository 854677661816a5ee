//! Repository implementations for SQLite storage

pub mod gallery;
pub mod password;
pub mod password_reset;
pub mod session;
pub mod user;

pub use gallery::SqliteGalleryRepository;
pub use password::SqlitePasswordRepository;
pub use password_reset::SqlitePasswordResetRepository;
pub use session::SqliteSessionRepository;
pub use user::SqliteUserRepository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use snapfolio_core::{
    Error,
    error::StorageError,
    repositories::{
        GalleryRepositoryProvider, PasswordRepositoryProvider, PasswordResetRepositoryProvider,
        RepositoryProvider, SessionRepositoryProvider, UserRepositoryProvider,
    },
};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::{str::FromStr, sync::Arc};

use crate::migrations::{self, SqliteMigrationManager};

/// Log a sqlx failure and turn it into a storage error naming the operation.
pub(crate) fn database_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Error {
    move |e| {
        tracing::error!(error = %e, "Failed to {operation}");
        Error::Storage(StorageError::Database(format!(
            "Failed to {operation}: {e}"
        )))
    }
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

/// Unix seconds as stored in SQLite back to a UTC timestamp.
pub(crate) fn from_timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Repository provider implementation for SQLite
///
/// This struct implements all the individual repository provider traits
/// as well as the unified `RepositoryProvider` trait.
pub struct SqliteRepositoryProvider {
    pool: SqlitePool,
    user: Arc<SqliteUserRepository>,
    session: Arc<SqliteSessionRepository>,
    password: Arc<SqlitePasswordRepository>,
    password_reset: Arc<SqlitePasswordResetRepository>,
    gallery: Arc<SqliteGalleryRepository>,
}

impl SqliteRepositoryProvider {
    pub fn new(pool: SqlitePool) -> Self {
        let user = Arc::new(SqliteUserRepository::new(pool.clone()));
        let session = Arc::new(SqliteSessionRepository::new(pool.clone()));
        let password = Arc::new(SqlitePasswordRepository::new(pool.clone()));
        let password_reset = Arc::new(SqlitePasswordResetRepository::new(pool.clone()));
        let gallery = Arc::new(SqliteGalleryRepository::new(pool.clone()));

        Self {
            pool,
            user,
            session,
            password,
            password_reset,
            gallery,
        }
    }

    /// Open a pool for `database_url`, creating the database file if needed
    pub async fn connect(database_url: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                tracing::error!(error = %e, "Invalid database URL");
                Error::Storage(StorageError::Connection(e.to_string()))
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database is private to the connection that opened it
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            10
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to connect to database");
                Error::Storage(StorageError::Connection(e.to_string()))
            })?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl UserRepositoryProvider for SqliteRepositoryProvider {
    type UserRepo = SqliteUserRepository;

    fn user(&self) -> &Self::UserRepo {
        &self.user
    }
}

impl SessionRepositoryProvider for SqliteRepositoryProvider {
    type SessionRepo = SqliteSessionRepository;

    fn session(&self) -> &Self::SessionRepo {
        &self.session
    }
}

impl PasswordRepositoryProvider for SqliteRepositoryProvider {
    type PasswordRepo = SqlitePasswordRepository;

    fn password(&self) -> &Self::PasswordRepo {
        &self.password
    }
}

impl PasswordResetRepositoryProvider for SqliteRepositoryProvider {
    type PasswordResetRepo = SqlitePasswordResetRepository;

    fn password_reset(&self) -> &Self::PasswordResetRepo {
        &self.password_reset
    }
}

impl GalleryRepositoryProvider for SqliteRepositoryProvider {
    type GalleryRepo = SqliteGalleryRepository;

    fn gallery(&self) -> &Self::GalleryRepo {
        &self.gallery
    }
}

#[async_trait]
impl RepositoryProvider for SqliteRepositoryProvider {
    async fn migrate(&self) -> Result<(), Error> {
        let manager = SqliteMigrationManager::new(self.pool.clone());
        manager.initialize().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to initialize migrations");
            Error::Storage(StorageError::Migration(
                "Failed to initialize migrations".to_string(),
            ))
        })?;

        manager.up(&migrations::all()).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            Error::Storage(StorageError::Migration(e.to_string()))
        })?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Connection(e.to_string())))?;
        Ok(())
    }
}
