#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use snapfolio::{Snapfolio, SnapfolioConfig, SqliteRepositoryProvider, User, UserId};

pub async fn setup() -> (Arc<SqliteRepositoryProvider>, Snapfolio<SqliteRepositoryProvider>) {
    setup_with_config(&SnapfolioConfig::default()).await
}

pub async fn setup_with_config(
    config: &SnapfolioConfig,
) -> (Arc<SqliteRepositoryProvider>, Snapfolio<SqliteRepositoryProvider>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let repositories = Arc::new(
        SqliteRepositoryProvider::connect("sqlite::memory:")
            .await
            .unwrap(),
    );
    let snapfolio = Snapfolio::new(repositories.clone()).with_config(config);
    snapfolio.migrate().await.unwrap();

    (repositories, snapfolio)
}

/// Insert a user row with a fixed id, bypassing sign up.
pub async fn insert_user(
    repositories: &SqliteRepositoryProvider,
    snapfolio: &Snapfolio<SqliteRepositoryProvider>,
    id: i64,
    email: &str,
) -> User {
    sqlx::query("INSERT INTO users (id, email, password_hash) VALUES (?1, ?2, ?3)")
        .bind(id)
        .bind(email)
        .bind("unused")
        .execute(repositories.pool())
        .await
        .unwrap();

    snapfolio.get_user(&UserId::new(id)).await.unwrap().unwrap()
}

/// A whole-second timestamp, matching the precision storage keeps.
pub fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap()
}

pub async fn count(repositories: &SqliteRepositoryProvider, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(repositories.pool())
        .await
        .unwrap()
}
