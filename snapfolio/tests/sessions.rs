#![cfg(feature = "sqlite")]

mod common;

use snapfolio::{Error, SnapfolioConfig, TokenError, UserId};

#[tokio::test]
async fn test_create_then_lookup_returns_owner() {
    let (repositories, snapfolio) = common::setup().await;
    let user = common::insert_user(&repositories, &snapfolio, 7, "a@b.com").await;

    let session = snapfolio.sessions().create(&user.id).await.unwrap();
    let found = snapfolio.current_user(session.token.as_str()).await.unwrap();

    assert_eq!(found.id, UserId::new(7));
    assert_eq!(found, user);
}

#[tokio::test]
async fn test_only_the_hash_is_stored() {
    let (repositories, snapfolio) = common::setup().await;
    let user = common::insert_user(&repositories, &snapfolio, 1, "alice@example.com").await;

    let session = snapfolio.sessions().create(&user.id).await.unwrap();

    let stored: String = sqlx::query_scalar("SELECT token_hash FROM sessions WHERE user_id = ?1")
        .bind(1_i64)
        .fetch_one(repositories.pool())
        .await
        .unwrap();
    assert_eq!(stored, session.token_hash);
    assert_ne!(stored, session.token.as_str());
}

#[tokio::test]
async fn test_lookup_after_delete_is_not_found() {
    let (repositories, snapfolio) = common::setup().await;
    let user = common::insert_user(&repositories, &snapfolio, 1, "alice@example.com").await;
    let session = snapfolio.sessions().create(&user.id).await.unwrap();

    snapfolio.sign_out(session.token.as_str()).await.unwrap();

    let result = snapfolio.current_user(session.token.as_str()).await;
    assert!(matches!(result, Err(Error::Token(TokenError::NotFound))));
    assert_eq!(common::count(&repositories, "sessions").await, 0);

    // signing out twice is fine
    snapfolio.sign_out(session.token.as_str()).await.unwrap();
}

#[tokio::test]
async fn test_second_create_invalidates_first_token() {
    let (repositories, snapfolio) = common::setup().await;
    let user = common::insert_user(&repositories, &snapfolio, 1, "alice@example.com").await;

    let first = snapfolio.sessions().create(&user.id).await.unwrap();
    let second = snapfolio.sessions().create(&user.id).await.unwrap();

    let old = snapfolio.current_user(first.token.as_str()).await;
    assert!(old.unwrap_err().is_unauthenticated());
    assert_eq!(
        snapfolio
            .current_user(second.token.as_str())
            .await
            .unwrap()
            .id,
        user.id
    );
    assert_eq!(common::count(&repositories, "sessions").await, 1);
}

#[tokio::test]
async fn test_sessions_of_different_users_are_independent() {
    let (repositories, snapfolio) = common::setup().await;
    let alice = common::insert_user(&repositories, &snapfolio, 1, "alice@example.com").await;
    let bob = common::insert_user(&repositories, &snapfolio, 2, "bob@example.com").await;

    let alice_session = snapfolio.sessions().create(&alice.id).await.unwrap();
    let bob_session = snapfolio.sessions().create(&bob.id).await.unwrap();

    snapfolio.sign_out(alice_session.token.as_str()).await.unwrap();

    assert!(snapfolio.current_user(alice_session.token.as_str()).await.is_err());
    assert_eq!(
        snapfolio
            .current_user(bob_session.token.as_str())
            .await
            .unwrap(),
        bob
    );
}

#[tokio::test]
async fn test_configured_token_size() {
    let config = SnapfolioConfig {
        bytes_per_token: 64,
        ..SnapfolioConfig::default()
    };
    let (repositories, snapfolio) = common::setup_with_config(&config).await;
    let user = common::insert_user(&repositories, &snapfolio, 1, "alice@example.com").await;

    let session = snapfolio.sessions().create(&user.id).await.unwrap();

    // 64 bytes encode to 86 unpadded base64 characters
    assert_eq!(session.token.as_str().len(), 86);
}

#[tokio::test]
async fn test_deleting_user_removes_session() {
    let (repositories, snapfolio) = common::setup().await;
    let user = common::insert_user(&repositories, &snapfolio, 1, "alice@example.com").await;
    let session = snapfolio.sessions().create(&user.id).await.unwrap();

    sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(1_i64)
        .execute(repositories.pool())
        .await
        .unwrap();

    assert!(snapfolio.current_user(session.token.as_str()).await.is_err());
    assert_eq!(common::count(&repositories, "sessions").await, 0);
}
