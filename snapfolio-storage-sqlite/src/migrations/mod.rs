//! Versioned schema migrations
//!
//! Applied versions are recorded in `_snapfolio_migrations`. Each migration runs
//! inside its own transaction together with the insert of its record, so a
//! failed migration leaves no trace.
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Migration failed: {0}")]
    Migration(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait Migration: Send + Sync {
    /// Unique version number for ordering migrations
    fn version(&self) -> i64;

    /// Human readable name of the migration
    fn name(&self) -> &str;

    async fn up<'a>(&'a self, conn: &'a mut SqliteConnection) -> Result<(), MigrationError>;

    async fn down<'a>(&'a self, conn: &'a mut SqliteConnection) -> Result<(), MigrationError>;
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: i64,
}

/// Every migration of the snapfolio schema, in version order.
pub fn all() -> Vec<Box<dyn Migration>> {
    vec![
        Box::new(CreateUsersTable),
        Box::new(CreateSessionsTable),
        Box::new(CreatePasswordResetsTable),
        Box::new(CreateGalleriesTable),
    ]
}

pub struct SqliteMigrationManager {
    pool: SqlitePool,
}

impl SqliteMigrationManager {
    const TABLE: &'static str = "_snapfolio_migrations";

    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the tracking table if it does not exist yet
    pub async fn initialize(&self) -> Result<(), MigrationError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at INTEGER NOT NULL
            );"#,
            Self::TABLE
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Apply every migration that has not been applied yet
    ///
    /// Versions must be strictly increasing.
    pub async fn up(&self, migrations: &[Box<dyn Migration>]) -> Result<(), MigrationError> {
        if migrations
            .windows(2)
            .any(|pair| pair[0].version() >= pair[1].version())
        {
            return Err(MigrationError::Migration(
                "migrations must be ordered by strictly increasing version".to_string(),
            ));
        }

        for migration in migrations {
            if self.is_applied(migration.version()).await? {
                continue;
            }

            let mut tx = self.pool.begin().await?;

            tracing::info!(
                "Applying migration {} ({})",
                migration.name(),
                migration.version()
            );

            migration.up(&mut *tx).await?;

            sqlx::query(&format!(
                "INSERT INTO {} (version, name, applied_at) VALUES (?1, ?2, ?3)",
                Self::TABLE
            ))
            .bind(migration.version())
            .bind(migration.name())
            .bind(Utc::now().timestamp())
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
        }

        Ok(())
    }

    /// Roll back applied migrations, newest first
    pub async fn down(&self, migrations: &[Box<dyn Migration>]) -> Result<(), MigrationError> {
        for migration in migrations.iter().rev() {
            if !self.is_applied(migration.version()).await? {
                continue;
            }

            let mut tx = self.pool.begin().await?;

            tracing::info!(
                "Rolling back migration {} ({})",
                migration.name(),
                migration.version()
            );

            migration.down(&mut *tx).await?;

            sqlx::query(&format!("DELETE FROM {} WHERE version = ?1", Self::TABLE))
                .bind(migration.version())
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
        }

        Ok(())
    }

    pub async fn applied_migrations(&self) -> Result<Vec<MigrationRecord>, MigrationError> {
        let records = sqlx::query_as::<_, MigrationRecord>(&format!(
            "SELECT version, name, applied_at FROM {} ORDER BY version",
            Self::TABLE
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn is_applied(&self, version: i64) -> Result<bool, MigrationError> {
        let applied: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE version = ?1)",
            Self::TABLE
        ))
        .bind(version)
        .fetch_one(&self.pool)
        .await?;

        Ok(applied)
    }
}

pub struct CreateUsersTable;

#[async_trait]
impl Migration for CreateUsersTable {
    fn version(&self) -> i64 {
        1
    }

    fn name(&self) -> &str {
        "CreateUsersTable"
    }

    async fn up<'a>(&'a self, conn: &'a mut SqliteConnection) -> Result<(), MigrationError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at INTEGER NOT NULL DEFAULT (unixepoch()),
                updated_at INTEGER NOT NULL DEFAULT (unixepoch())
            );"#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn down<'a>(&'a self, conn: &'a mut SqliteConnection) -> Result<(), MigrationError> {
        sqlx::query("DROP TABLE IF EXISTS users")
            .execute(conn)
            .await?;
        Ok(())
    }
}

pub struct CreateSessionsTable;

#[async_trait]
impl Migration for CreateSessionsTable {
    fn version(&self) -> i64 {
        2
    }

    fn name(&self) -> &str {
        "CreateSessionsTable"
    }

    async fn up<'a>(&'a self, conn: &'a mut SqliteConnection) -> Result<(), MigrationError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                token_hash TEXT NOT NULL UNIQUE
            );"#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn down<'a>(&'a self, conn: &'a mut SqliteConnection) -> Result<(), MigrationError> {
        sqlx::query("DROP TABLE IF EXISTS sessions")
            .execute(conn)
            .await?;
        Ok(())
    }
}

pub struct CreatePasswordResetsTable;

#[async_trait]
impl Migration for CreatePasswordResetsTable {
    fn version(&self) -> i64 {
        3
    }

    fn name(&self) -> &str {
        "CreatePasswordResetsTable"
    }

    async fn up<'a>(&'a self, conn: &'a mut SqliteConnection) -> Result<(), MigrationError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS password_resets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                token_hash TEXT NOT NULL UNIQUE,
                expires_at INTEGER NOT NULL
            );"#,
        )
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_password_resets_expires_at ON password_resets(expires_at)",
        )
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn down<'a>(&'a self, conn: &'a mut SqliteConnection) -> Result<(), MigrationError> {
        sqlx::query("DROP TABLE IF EXISTS password_resets")
            .execute(conn)
            .await?;
        Ok(())
    }
}

pub struct CreateGalleriesTable;

#[async_trait]
impl Migration for CreateGalleriesTable {
    fn version(&self) -> i64 {
        4
    }

    fn name(&self) -> &str {
        "CreateGalleriesTable"
    }

    async fn up<'a>(&'a self, conn: &'a mut SqliteConnection) -> Result<(), MigrationError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS galleries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT NOT NULL
            );"#,
        )
        .execute(&mut *conn)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_galleries_user_id ON galleries(user_id)")
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    async fn down<'a>(&'a self, conn: &'a mut SqliteConnection) -> Result<(), MigrationError> {
        sqlx::query("DROP TABLE IF EXISTS galleries")
            .execute(conn)
            .await?;
        Ok(())
    }
}
