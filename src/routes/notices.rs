use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::NoticeChanges,
    notices::NoticeService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

/// Form body of `POST /create-notice`. Absent fields are treated as empty.
#[derive(Debug, Deserialize)]
pub struct NoticeForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Lists every notice, newest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of notices, each with `username` and `is_owner`.
/// - `401 Unauthorized`: no valid session.
#[get("/get-notices")]
pub async fn get_notices(
    user: AuthenticatedUser,
    notices: web::Data<NoticeService>,
) -> Result<impl Responder, AppError> {
    let listing = notices.list(user.0).await?;
    Ok(HttpResponse::Ok().json(listing))
}

/// Posts a new notice as the logged-in user.
///
/// ## Request Body:
/// URL-encoded form with `title` and `content`.
///
/// ## Responses:
/// - `200 OK`: the created notice.
/// - `400 Bad Request`: title or content missing or empty.
/// - `401 Unauthorized`: no valid session.
#[post("/create-notice")]
pub async fn create_notice(
    user: AuthenticatedUser,
    notices: web::Data<NoticeService>,
    form: web::Form<NoticeForm>,
) -> Result<impl Responder, AppError> {
    let notice = notices.create(user.0, &form.title, &form.content).await?;
    Ok(HttpResponse::Ok().json(notice))
}

/// Edits a notice owned by the logged-in user. Fields left out of the body keep
/// their current value.
///
/// ## Request Body:
/// JSON object with optional `title` and `content`.
///
/// ## Responses:
/// - `200 OK`: the notice after the edit.
/// - `400 Bad Request`: a provided field is empty.
/// - `401 Unauthorized`: no valid session.
/// - `403 Forbidden`: the notice belongs to someone else.
/// - `404 Not Found`: no notice with this id.
#[put("/edit-notice/{id}")]
pub async fn edit_notice(
    user: AuthenticatedUser,
    notices: web::Data<NoticeService>,
    notice_id: web::Path<i64>,
    changes: web::Json<NoticeChanges>,
) -> Result<impl Responder, AppError> {
    let notice = notices
        .update(user.0, notice_id.into_inner(), &changes)
        .await?;
    Ok(HttpResponse::Ok().json(notice))
}

/// Deletes a notice owned by the logged-in user.
///
/// ## Responses:
/// - `200 OK`: `{"message": ...}`.
/// - `401 Unauthorized`: no valid session.
/// - `403 Forbidden`: the notice belongs to someone else.
/// - `404 Not Found`: no notice with this id, including one already deleted.
#[delete("/delete-notice/{id}")]
pub async fn delete_notice(
    user: AuthenticatedUser,
    notices: web::Data<NoticeService>,
    notice_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    notices.delete(user.0, notice_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Notice deleted successfully."
    })))
}
