use async_trait::async_trait;
use snapfolio_core::{Error, UserId, error::AuthError, repositories::PasswordRepository};
use sqlx::SqlitePool;

use super::database_error;

pub struct SqlitePasswordRepository {
    pool: SqlitePool,
}

impl SqlitePasswordRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasswordRepository for SqlitePasswordRepository {
    async fn set_password_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error> {
        let result =
            sqlx::query("UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3")
                .bind(hash)
                .bind(chrono::Utc::now().timestamp())
                .bind(user_id.as_i64())
                .execute(&self.pool)
                .await
                .map_err(database_error("update password hash"))?;

        if result.rows_affected() == 0 {
            return Err(Error::Auth(AuthError::UserDoesNotExist));
        }
        Ok(())
    }

    async fn get_password_hash(&self, user_id: &UserId) -> Result<Option<String>, Error> {
        let hash: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE id = ?1")
                .bind(user_id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error("query password hash"))?;

        Ok(hash)
    }
}
