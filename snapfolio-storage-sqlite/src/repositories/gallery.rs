use async_trait::async_trait;
use snapfolio_core::{Error, Gallery, UserId, repositories::GalleryRepository};
use sqlx::SqlitePool;

use super::database_error;

pub struct SqliteGalleryRepository {
    pool: SqlitePool,
}

impl SqliteGalleryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct SqliteGallery {
    id: i64,
    user_id: i64,
    title: String,
}

impl From<SqliteGallery> for Gallery {
    fn from(gallery: SqliteGallery) -> Self {
        Gallery {
            id: gallery.id,
            user_id: UserId::new(gallery.user_id),
            title: gallery.title,
        }
    }
}

#[async_trait]
impl GalleryRepository for SqliteGalleryRepository {
    async fn create(&self, user_id: &UserId, title: &str) -> Result<Gallery, Error> {
        let gallery = sqlx::query_as::<_, SqliteGallery>(
            "INSERT INTO galleries (user_id, title) VALUES (?1, ?2) RETURNING id, user_id, title",
        )
        .bind(user_id.as_i64())
        .bind(title)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error("create gallery"))?;

        Ok(gallery.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Gallery>, Error> {
        let gallery = sqlx::query_as::<_, SqliteGallery>(
            "SELECT id, user_id, title FROM galleries WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("query gallery by id"))?;

        Ok(gallery.map(Into::into))
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Gallery>, Error> {
        let galleries = sqlx::query_as::<_, SqliteGallery>(
            "SELECT id, user_id, title FROM galleries WHERE user_id = ?1 ORDER BY id",
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(database_error("query galleries by user id"))?;

        Ok(galleries.into_iter().map(Into::into).collect())
    }

    async fn update(&self, gallery: &Gallery) -> Result<bool, Error> {
        let result = sqlx::query("UPDATE galleries SET title = ?2 WHERE id = ?1")
            .bind(gallery.id)
            .bind(&gallery.title)
            .execute(&self.pool)
            .await
            .map_err(database_error("update gallery"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM galleries WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(database_error("delete gallery"))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_utils::{create_user, setup_provider};
    use snapfolio_core::repositories::GalleryRepositoryProvider;

    #[tokio::test]
    async fn test_gallery_crud() {
        let provider = setup_provider().await;
        let user = create_user(&provider, "alice@example.com").await;

        let mut gallery = provider.gallery().create(&user.id, "Trip").await.unwrap();
        assert_eq!(gallery.user_id, user.id);

        let found = provider.gallery().find_by_id(gallery.id).await.unwrap();
        assert_eq!(found, Some(gallery.clone()));

        gallery.title = "Road trip".to_string();
        assert!(provider.gallery().update(&gallery).await.unwrap());
        let found = provider.gallery().find_by_id(gallery.id).await.unwrap();
        assert_eq!(found.unwrap().title, "Road trip");

        assert!(provider.gallery().delete(gallery.id).await.unwrap());
        assert!(!provider.gallery().delete(gallery.id).await.unwrap());
        assert!(
            provider
                .gallery()
                .find_by_id(gallery.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_find_by_user_id() {
        let provider = setup_provider().await;
        let alice = create_user(&provider, "alice@example.com").await;
        let bob = create_user(&provider, "bob@example.com").await;

        let first = provider.gallery().create(&alice.id, "One").await.unwrap();
        let second = provider.gallery().create(&alice.id, "Two").await.unwrap();
        provider.gallery().create(&bob.id, "Bob's").await.unwrap();

        let galleries = provider.gallery().find_by_user_id(&alice.id).await.unwrap();
        assert_eq!(galleries, vec![first, second]);

        let empty = provider
            .gallery()
            .find_by_user_id(&UserId::new(999))
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_gallery() {
        let provider = setup_provider().await;

        let missing = Gallery {
            id: 12,
            user_id: UserId::new(1),
            title: "Nothing".to_string(),
        };
        assert!(!provider.gallery().update(&missing).await.unwrap());
    }
}
