use async_trait::async_trait;
use chrono::{DateTime, Utc};
use snapfolio_core::{
    Error, StoredPasswordReset, User, UserId, repositories::PasswordResetRepository,
};
use sqlx::SqlitePool;

use super::{database_error, from_timestamp};

pub struct SqlitePasswordResetRepository {
    pool: SqlitePool,
}

impl SqlitePasswordResetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct SqlitePasswordReset {
    id: i64,
    user_id: i64,
    token_hash: String,
    expires_at: i64,
}

impl From<SqlitePasswordReset> for StoredPasswordReset {
    fn from(reset: SqlitePasswordReset) -> Self {
        StoredPasswordReset {
            id: reset.id,
            user_id: UserId::new(reset.user_id),
            token_hash: reset.token_hash,
            expires_at: from_timestamp(reset.expires_at),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct SqlitePasswordResetWithUser {
    reset_id: i64,
    user_id: i64,
    token_hash: String,
    expires_at: i64,
    email: String,
    created_at: i64,
    updated_at: i64,
}

impl From<SqlitePasswordResetWithUser> for (StoredPasswordReset, User) {
    fn from(row: SqlitePasswordResetWithUser) -> Self {
        let user_id = UserId::new(row.user_id);
        (
            StoredPasswordReset {
                id: row.reset_id,
                user_id,
                token_hash: row.token_hash,
                expires_at: from_timestamp(row.expires_at),
            },
            User {
                id: user_id,
                email: row.email,
                created_at: from_timestamp(row.created_at),
                updated_at: from_timestamp(row.updated_at),
            },
        )
    }
}

#[async_trait]
impl PasswordResetRepository for SqlitePasswordResetRepository {
    async fn upsert(
        &self,
        user_id: &UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<StoredPasswordReset, Error> {
        let reset = sqlx::query_as::<_, SqlitePasswordReset>(
            r#"
            INSERT INTO password_resets (user_id, token_hash, expires_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (user_id) DO UPDATE
            SET token_hash = excluded.token_hash, expires_at = excluded.expires_at
            RETURNING id, user_id, token_hash, expires_at
            "#,
        )
        .bind(user_id.as_i64())
        .bind(token_hash)
        .bind(expires_at.timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(database_error("upsert password reset"))?;

        Ok(reset.into())
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<(StoredPasswordReset, User)>, Error> {
        let row = sqlx::query_as::<_, SqlitePasswordResetWithUser>(
            r#"
            SELECT password_resets.id AS reset_id, password_resets.user_id,
                   password_resets.token_hash, password_resets.expires_at,
                   users.email, users.created_at, users.updated_at
            FROM password_resets
            JOIN users ON users.id = password_resets.user_id
            WHERE password_resets.token_hash = ?1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("query password reset by token hash"))?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM password_resets WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(database_error("delete password reset"))?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM password_resets WHERE expires_at < ?1")
            .bind(now.timestamp())
            .execute(&self.pool)
            .await
            .map_err(database_error("delete expired password resets"))?;

        Ok(result.rows_affected())
    }
}
