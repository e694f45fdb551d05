//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the noticeboard.
//! Every failure a request can run into (bad credentials, missing session, editing
//! somebody else's notice, a dropped database connection) is one of its variants.
//!
//! `AppError` implements `actix_web::error::ResponseError` so API handlers can return
//! it directly and get a JSON body of the form `{"error": "..."}` with the matching
//! status code. `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `bcrypt::BcryptError` and `askama::Error` allow the `?` operator at the persistence
//! and rendering boundaries.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, PartialEq)]
pub enum AppError {
    /// A registration attempt used a username that is already taken (HTTP 409).
    DuplicateUsername,
    /// Login failed. Deliberately does not say whether the username or the
    /// password was wrong (HTTP 401).
    InvalidCredentials,
    /// No session, or a session token the store does not know (HTTP 401).
    Unauthenticated(String),
    /// The requester is logged in but does not own the notice (HTTP 403).
    Forbidden(String),
    /// The requested notice does not exist (HTTP 404).
    NotFound(String),
    /// A required field is missing or out of bounds (HTTP 400).
    ValidationError(String),
    /// Represents an error originating from database operations (HTTP 500).
    /// Wraps errors from the `sqlx` crate.
    DatabaseError(String),
    /// Represents an unexpected server-side error (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::DuplicateUsername => write!(f, "Username already exists"),
            AppError::InvalidCredentials => write!(f, "Invalid username or password"),
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// The message shown to the client. Server-side failures are not echoed back.
    fn client_message(&self) -> String {
        match self {
            AppError::DuplicateUsername => {
                "Username already exists. Please choose a different one.".into()
            }
            AppError::InvalidCredentials => "Invalid username or password.".into(),
            AppError::Unauthenticated(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => msg.clone(),
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                "Internal server error.".into()
            }
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DuplicateUsername => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.client_message()
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` becomes `AppError::NotFound`; everything else is a
/// `DatabaseError` and gets logged here, since the client only sees a generic message.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => {
                log::error!("database error: {}", error);
                AppError::DatabaseError(error.to_string())
            }
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The custom `message` of the first failing rule is used when there is one, so the
/// client sees "Title is required." rather than the validator's debug rendering.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        let message = error
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| error.to_string());
        AppError::ValidationError(message)
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<askama::Error> for AppError {
    fn from(error: askama::Error) -> AppError {
        log::error!("template rendering failed: {}", error);
        AppError::InternalServerError(error.to_string())
    }
}
