//! Server-side sessions.
//!
//! A session is nothing more than an unguessable token mapped to a user id. The
//! [`SessionManager`] mints and resolves tokens; where the mapping lives is up to
//! the [`SessionStore`] it was built with.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{config::SessionBackend, error::AppError, models::UserId};

/// Name of the cookie that carries the session token.
pub const SESSION_COOKIE: &str = "session";

/// Backing storage for session tokens.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, token: &str, user_id: UserId) -> Result<(), AppError>;
    async fn get(&self, token: &str) -> Result<Option<UserId>, AppError>;
    /// Removing an unknown token is not an error.
    async fn remove(&self, token: &str) -> Result<(), AppError>;
}

/// Keeps sessions in process memory. Everyone is logged out on restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, UserId>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, token: &str, user_id: UserId) -> Result<(), AppError> {
        self.sessions.write().await.insert(token.to_owned(), user_id);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<UserId>, AppError> {
        Ok(self.sessions.read().await.get(token).copied())
    }

    async fn remove(&self, token: &str) -> Result<(), AppError> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}

/// Keeps sessions in the `session` table so they survive restarts.
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn insert(&self, token: &str, user_id: UserId) -> Result<(), AppError> {
        sqlx::query("INSERT INTO session (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(token)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<UserId>, AppError> {
        let user_id = sqlx::query_scalar::<_, UserId>("SELECT user_id FROM session WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user_id)
    }

    async fn remove(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM session WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Issues, resolves and destroys session tokens.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    pub fn for_backend(backend: SessionBackend, pool: SqlitePool) -> Self {
        match backend {
            SessionBackend::Memory => Self::in_memory(),
            SessionBackend::Database => Self::new(Arc::new(SqliteSessionStore::new(pool))),
        }
    }

    /// Starts a session for `user_id` and returns its token.
    pub async fn create(&self, user_id: UserId) -> Result<String, AppError> {
        let token = Uuid::new_v4().simple().to_string();
        self.store.insert(&token, user_id).await?;
        log::info!("session started for user {}", user_id);
        Ok(token)
    }

    pub async fn resolve(&self, token: &str) -> Result<Option<UserId>, AppError> {
        if token.is_empty() {
            return Ok(None);
        }
        self.store.get(token).await
    }

    pub async fn destroy(&self, token: &str) -> Result<(), AppError> {
        self.store.remove(token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::CredentialStore, db, models::Credentials};

    async fn exercise(manager: SessionManager, user_id: UserId) {
        let token = manager.create(user_id).await.unwrap();
        assert_eq!(token.len(), 32);
        assert_eq!(manager.resolve(&token).await.unwrap(), Some(user_id));

        let other = manager.create(user_id).await.unwrap();
        assert_ne!(token, other);

        manager.destroy(&token).await.unwrap();
        assert_eq!(manager.resolve(&token).await.unwrap(), None);
        // Destroying twice is fine.
        manager.destroy(&token).await.unwrap();

        assert_eq!(manager.resolve(&other).await.unwrap(), Some(user_id));
        assert_eq!(manager.resolve("not-a-token").await.unwrap(), None);
        assert_eq!(manager.resolve("").await.unwrap(), None);
    }

    #[actix_rt::test]
    async fn test_memory_sessions() {
        exercise(SessionManager::in_memory(), UserId(1)).await;
    }

    #[actix_rt::test]
    async fn test_sqlite_sessions() {
        let pool = db::connect("sqlite::memory:").await.unwrap();
        let user_id = CredentialStore::new(pool.clone(), 4)
            .register(&Credentials {
                username: "alice".to_string(),
                password: "pw1".to_string(),
            })
            .await
            .unwrap();

        let manager = SessionManager::new(Arc::new(SqliteSessionStore::new(pool)));
        exercise(manager, user_id).await;
    }
}
