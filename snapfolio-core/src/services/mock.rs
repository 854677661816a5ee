//! In-memory repositories for service tests
use crate::{
    Error, Gallery, NewUser, StoredPasswordReset, StoredSession, User, UserId,
    error::{AuthError, StorageError},
    repositories::{
        GalleryRepository, PasswordRepository, PasswordResetRepository, SessionRepository,
        UserRepository,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Default)]
struct State {
    next_id: i64,
    users: HashMap<UserId, (User, String)>,
    sessions: HashMap<UserId, StoredSession>,
    resets: HashMap<UserId, StoredPasswordReset>,
    galleries: HashMap<i64, Gallery>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Implements every repository trait over one shared map set, so a session or
/// reset lookup can join against the users it was created for.
#[derive(Default)]
pub(crate) struct MockRepository {
    state: Mutex<State>,
    fail_writes: bool,
}

impl MockRepository {
    /// A repository whose write operations always fail with a storage error.
    pub(crate) fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Default::default()
        }
    }

    pub(crate) async fn insert_user(&self, id: i64, email: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: UserId::new(id),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        };
        let mut state = self.state.lock().await;
        state.next_id = state.next_id.max(id);
        state
            .users
            .insert(user.id, (user.clone(), "unset".to_string()));
        user
    }

    pub(crate) async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }

    pub(crate) async fn reset_count(&self) -> usize {
        self.state.lock().await.resets.len()
    }

    fn check_writable(&self) -> Result<(), Error> {
        if self.fail_writes {
            return Err(Error::Storage(StorageError::Database(
                "database is locked".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MockRepository {
    async fn create(&self, user: NewUser) -> Result<User, Error> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        if state.users.values().any(|(u, _)| u.email == user.email) {
            return Err(Error::Auth(AuthError::EmailTaken));
        }

        let now = Utc::now();
        let created = User {
            id: UserId::new(state.next_id()),
            email: user.email,
            created_at: now,
            updated_at: now,
        };
        state
            .users
            .insert(created.id, (created.clone(), user.password_hash));
        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        Ok(self.state.lock().await.users.get(id).map(|(u, _)| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        Ok(self
            .state
            .lock()
            .await
            .users
            .values()
            .find(|(u, _)| u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn update_email(&self, id: &UserId, email: &str) -> Result<Option<User>, Error> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        if state
            .users
            .values()
            .any(|(u, _)| u.email == email && u.id != *id)
        {
            return Err(Error::Auth(AuthError::EmailTaken));
        }

        Ok(state.users.get_mut(id).map(|(u, _)| {
            u.email = email.to_string();
            u.updated_at = Utc::now();
            u.clone()
        }))
    }
}

#[async_trait]
impl PasswordRepository for MockRepository {
    async fn set_password_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        let (_, stored) = state
            .users
            .get_mut(user_id)
            .ok_or(Error::Auth(AuthError::UserDoesNotExist))?;
        *stored = hash.to_string();
        Ok(())
    }

    async fn get_password_hash(&self, user_id: &UserId) -> Result<Option<String>, Error> {
        Ok(self
            .state
            .lock()
            .await
            .users
            .get(user_id)
            .map(|(_, hash)| hash.clone()))
    }
}

#[async_trait]
impl SessionRepository for MockRepository {
    async fn upsert(&self, user_id: &UserId, token_hash: &str) -> Result<StoredSession, Error> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        let id = match state.sessions.get(user_id).map(|existing| existing.id) {
            Some(id) => id,
            None => state.next_id(),
        };
        let session = StoredSession {
            id,
            user_id: *user_id,
            token_hash: token_hash.to_string(),
        };
        state.sessions.insert(*user_id, session.clone());
        Ok(session)
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<(StoredSession, User)>, Error> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .values()
            .find(|s| s.token_hash == token_hash)
            .and_then(|s| {
                state
                    .users
                    .get(&s.user_id)
                    .map(|(u, _)| (s.clone(), u.clone()))
            }))
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), Error> {
        self.check_writable()?;
        self.state
            .lock()
            .await
            .sessions
            .retain(|_, s| s.token_hash != token_hash);
        Ok(())
    }
}

#[async_trait]
impl PasswordResetRepository for MockRepository {
    async fn upsert(
        &self,
        user_id: &UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<StoredPasswordReset, Error> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        let id = match state.resets.get(user_id).map(|existing| existing.id) {
            Some(id) => id,
            None => state.next_id(),
        };
        let reset = StoredPasswordReset {
            id,
            user_id: *user_id,
            token_hash: token_hash.to_string(),
            expires_at,
        };
        state.resets.insert(*user_id, reset.clone());
        Ok(reset)
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<(StoredPasswordReset, User)>, Error> {
        let state = self.state.lock().await;
        Ok(state
            .resets
            .values()
            .find(|r| r.token_hash == token_hash)
            .and_then(|r| {
                state
                    .users
                    .get(&r.user_id)
                    .map(|(u, _)| (r.clone(), u.clone()))
            }))
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        self.check_writable()?;
        self.state.lock().await.resets.retain(|_, r| r.id != id);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, Error> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        let before = state.resets.len();
        state.resets.retain(|_, r| r.expires_at >= now);
        Ok((before - state.resets.len()) as u64)
    }
}

#[async_trait]
impl GalleryRepository for MockRepository {
    async fn create(&self, user_id: &UserId, title: &str) -> Result<Gallery, Error> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        let gallery = Gallery {
            id: state.next_id(),
            user_id: *user_id,
            title: title.to_string(),
        };
        state.galleries.insert(gallery.id, gallery.clone());
        Ok(gallery)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Gallery>, Error> {
        Ok(self.state.lock().await.galleries.get(&id).cloned())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Gallery>, Error> {
        let mut galleries: Vec<Gallery> = self
            .state
            .lock()
            .await
            .galleries
            .values()
            .filter(|g| g.user_id == *user_id)
            .cloned()
            .collect();
        galleries.sort_by_key(|g| g.id);
        Ok(galleries)
    }

    async fn update(&self, gallery: &Gallery) -> Result<bool, Error> {
        self.check_writable()?;
        match self.state.lock().await.galleries.get_mut(&gallery.id) {
            Some(existing) => {
                existing.title = gallery.title.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, Error> {
        self.check_writable()?;
        Ok(self.state.lock().await.galleries.remove(&id).is_some())
    }
}
