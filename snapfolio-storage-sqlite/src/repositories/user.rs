use async_trait::async_trait;
use snapfolio_core::{
    Error, NewUser, User, UserId, error::AuthError, repositories::UserRepository,
};
use sqlx::SqlitePool;

use super::{database_error, from_timestamp, is_unique_violation};

#[derive(Debug, Clone, sqlx::FromRow)]
struct SqliteUser {
    id: i64,
    email: String,
    created_at: i64,
    updated_at: i64,
}

impl From<SqliteUser> for User {
    fn from(user: SqliteUser) -> Self {
        User {
            id: UserId::new(user.id),
            email: user.email,
            created_at: from_timestamp(user.created_at),
            updated_at: from_timestamp(user.updated_at),
        }
    }
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, Error> {
        let now = chrono::Utc::now().timestamp();

        let sqlite_user = sqlx::query_as::<_, SqliteUser>(
            r#"
            INSERT INTO users (email, password_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, email, created_at, updated_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Auth(AuthError::EmailTaken)
            } else {
                database_error("create user")(e)
            }
        })?;

        Ok(sqlite_user.into())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        let sqlite_user = sqlx::query_as::<_, SqliteUser>(
            "SELECT id, email, created_at, updated_at FROM users WHERE id = ?1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("query user by id"))?;

        Ok(sqlite_user.map(|u| u.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let sqlite_user = sqlx::query_as::<_, SqliteUser>(
            "SELECT id, email, created_at, updated_at FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("query user by email"))?;

        Ok(sqlite_user.map(|u| u.into()))
    }

    async fn update_email(&self, id: &UserId, email: &str) -> Result<Option<User>, Error> {
        let sqlite_user = sqlx::query_as::<_, SqliteUser>(
            r#"
            UPDATE users
            SET email = ?2, updated_at = ?3
            WHERE id = ?1
            RETURNING id, email, created_at, updated_at
            "#,
        )
        .bind(id.as_i64())
        .bind(email)
        .bind(chrono::Utc::now().timestamp())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Auth(AuthError::EmailTaken)
            } else {
                database_error("update email")(e)
            }
        })?;

        Ok(sqlite_user.map(|u| u.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_utils::{create_user, setup_provider};
    use snapfolio_core::repositories::UserRepositoryProvider;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let provider = setup_provider().await;
        let user = create_user(&provider, "alice@example.com").await;

        assert!(user.id.as_i64() > 0);
        assert_eq!(user.email, "alice@example.com");

        let by_id = provider.user().find_by_id(&user.id).await.unwrap();
        assert_eq!(by_id, Some(user.clone()));

        let by_email = provider
            .user()
            .find_by_email("alice@example.com")
            .await
            .unwrap();
        assert_eq!(by_email, Some(user));

        let missing = provider
            .user()
            .find_by_email("nobody@example.com")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_taken() {
        let provider = setup_provider().await;
        create_user(&provider, "alice@example.com").await;

        let result = provider
            .user()
            .create(NewUser::new("alice@example.com", "hash"))
            .await;
        assert!(matches!(result, Err(Error::Auth(AuthError::EmailTaken))));
    }

    #[tokio::test]
    async fn test_update_email() {
        let provider = setup_provider().await;
        let alice = create_user(&provider, "alice@example.com").await;
        create_user(&provider, "bob@example.com").await;

        let updated = provider
            .user()
            .update_email(&alice.id, "alice@new.example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.email, "alice@new.example.com");

        let taken = provider
            .user()
            .update_email(&alice.id, "bob@example.com")
            .await;
        assert!(matches!(taken, Err(Error::Auth(AuthError::EmailTaken))));

        let missing = provider
            .user()
            .update_email(&UserId::new(999), "ghost@example.com")
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
