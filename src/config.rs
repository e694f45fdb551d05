use std::env;

use crate::error::AppError;

/// Footer credit used when `SITE_AUTHOR` is unset.
pub const DEFAULT_SITE_AUTHOR: &str = "The noticeboard team";

/// Where sessions are kept between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    /// Process-local map. Sessions are lost on restart.
    Memory,
    /// The `session` table next to users and notices.
    Database,
}

pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub session_backend: SessionBackend,
    pub bcrypt_cost: u32,
    pub site_author: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// defaults for anything unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_port = match lookup("SERVER_PORT") {
            Some(port) => port.parse().map_err(|_| {
                AppError::InternalServerError(format!("SERVER_PORT must be a number, got {port:?}"))
            })?,
            None => 8080,
        };

        let session_backend = match lookup("SESSION_BACKEND").as_deref() {
            None | Some("database") => SessionBackend::Database,
            Some("memory") => SessionBackend::Memory,
            Some(other) => {
                return Err(AppError::InternalServerError(format!(
                    "SESSION_BACKEND must be \"memory\" or \"database\", got {other:?}"
                )))
            }
        };

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(cost) => cost
                .parse::<u32>()
                .ok()
                .filter(|cost| (4..=31).contains(cost))
                .ok_or_else(|| {
                    AppError::InternalServerError(format!(
                        "BCRYPT_COST must be between 4 and 31, got {cost:?}"
                    ))
                })?,
            None => bcrypt::DEFAULT_COST,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://noticeboard.db?mode=rwc".to_string()),
            server_port,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            session_backend,
            bcrypt_cost,
            site_author: lookup("SITE_AUTHOR")
                .unwrap_or_else(|| DEFAULT_SITE_AUTHOR.to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
