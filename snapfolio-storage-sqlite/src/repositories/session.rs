use async_trait::async_trait;
use snapfolio_core::{
    Error, StoredSession, User, UserId, repositories::SessionRepository,
};
use sqlx::SqlitePool;

use super::{database_error, from_timestamp};

pub struct SqliteSessionRepository {
    pool: SqlitePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct SqliteSession {
    id: i64,
    user_id: i64,
    token_hash: String,
}

impl From<SqliteSession> for StoredSession {
    fn from(session: SqliteSession) -> Self {
        StoredSession {
            id: session.id,
            user_id: UserId::new(session.user_id),
            token_hash: session.token_hash,
        }
    }
}

/// A session joined with the user that owns it.
#[derive(Debug, Clone, sqlx::FromRow)]
struct SqliteSessionWithUser {
    session_id: i64,
    user_id: i64,
    token_hash: String,
    email: String,
    created_at: i64,
    updated_at: i64,
}

impl From<SqliteSessionWithUser> for (StoredSession, User) {
    fn from(row: SqliteSessionWithUser) -> Self {
        let user_id = UserId::new(row.user_id);
        (
            StoredSession {
                id: row.session_id,
                user_id,
                token_hash: row.token_hash,
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
impl SessionRepository for SqliteSessionRepository {
    async fn upsert(&self, user_id: &UserId, token_hash: &str) -> Result<StoredSession, Error> {
        let session = sqlx::query_as::<_, SqliteSession>(
            r#"
            INSERT INTO sessions (user_id, token_hash)
            VALUES (?1, ?2)
            ON CONFLICT (user_id) DO UPDATE SET token_hash = excluded.token_hash
            RETURNING id, user_id, token_hash
            "#,
        )
        .bind(user_id.as_i64())
        .bind(token_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error("upsert session"))?;

        Ok(session.into())
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<(StoredSession, User)>, Error> {
        let row = sqlx::query_as::<_, SqliteSessionWithUser>(
            r#"
            SELECT sessions.id AS session_id, sessions.user_id, sessions.token_hash,
                   users.email, users.created_at, users.updated_at
            FROM sessions
            JOIN users ON users.id = sessions.user_id
            WHERE sessions.token_hash = ?1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("query session by token hash"))?;

        Ok(row.map(Into::into))
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), Error> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(database_error("delete session"))?;

        Ok(())
    }
}
