use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;

use crate::error::AppError;

/// Liveness probe for the noticeboard.
///
/// Counts the stored notices, so a missing schema or a closed pool shows up
/// as a 500 instead of a cheerful `ok`.
#[get("/health")]
pub async fn health(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let (notices,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notice")
        .fetch_one(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "notices": notices,
        "timestamp": Utc::now()
    })))
}
