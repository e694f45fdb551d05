use std::sync::Arc;

use actix_web::web;
use chrono::Utc;
use sqlx::SqlitePool;
use tokio::sync::OnceCell;
use validator::Validate;

use crate::{
    auth::password::{hash_password, verify_password},
    error::AppError,
    models::{Credentials, User, UserId},
};

/// Persists accounts and checks passwords against the stored bcrypt hashes.
#[derive(Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
    bcrypt_cost: u32,
    /// Checked against when the username is unknown, so a miss costs one bcrypt
    /// verification just like a wrong password.
    dummy_hash: Arc<OnceCell<String>>,
}

impl CredentialStore {
    pub fn new(pool: SqlitePool, bcrypt_cost: u32) -> Self {
        Self {
            pool,
            bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Creates a new account.
    ///
    /// Uniqueness is left to the `UNIQUE` index on `user.username`, so two racing
    /// registrations for the same name cannot both succeed.
    pub async fn register(&self, credentials: &Credentials) -> Result<UserId, AppError> {
        credentials.validate()?;

        let password = credentials.password.clone();
        let cost = self.bcrypt_cost;
        let password_hash = web::block(move || hash_password(&password, cost))
            .await
            .map_err(|e| AppError::InternalServerError(e.to_string()))??;

        let result = sqlx::query(
            "INSERT INTO user (username, password, is_admin, created_at) VALUES (?, ?, 0, ?)",
        )
        .bind(&credentials.username)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => {
                let user_id = UserId(done.last_insert_rowid());
                log::info!("registered user {} as {}", credentials.username, user_id);
                Ok(user_id)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                log::info!("registration rejected, {} is taken", credentials.username);
                Err(AppError::DuplicateUsername)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Checks a username/password pair.
    ///
    /// An unknown username and a wrong password produce the same error.
    pub async fn verify(&self, username: &str, password: &str) -> Result<UserId, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, is_admin, created_at FROM user WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let Some(user) = user else {
            let dummy_hash = self.dummy_hash().await?;
            check_password(password, dummy_hash).await?;
            return Err(AppError::InvalidCredentials);
        };

        if check_password(password, user.password_hash).await? {
            Ok(user.id)
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    async fn dummy_hash(&self) -> Result<String, AppError> {
        let cost = self.bcrypt_cost;
        let hashed = self
            .dummy_hash
            .get_or_try_init(|| async move {
                let hashed = web::block(move || hash_password("not-a-password", cost))
                    .await
                    .map_err(|e| AppError::InternalServerError(e.to_string()))??;
                Ok::<_, AppError>(hashed)
            })
            .await?;
        Ok(hashed.clone())
    }

    pub async fn find(&self, user_id: UserId) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, is_admin, created_at FROM user WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

/// Runs the bcrypt comparison on the blocking pool.
async fn check_password(password: &str, password_hash: String) -> Result<bool, AppError> {
    let password = password.to_owned();
    web::block(move || verify_password(&password, &password_hash))
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
}
