#![allow(dead_code)]

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
};
use noticeboard::{
    auth::{SessionManager, SESSION_COOKIE},
    db,
    flash::FLASH_COOKIE,
    AppServices,
};

/// Fresh in-memory database, in-memory sessions and the cheapest bcrypt cost.
pub async fn services() -> AppServices {
    let pool = db::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    AppServices::new(pool, SessionManager::in_memory(), 4)
}

/// Builds the full application around `AppServices`, the same way `main` does.
macro_rules! init_app {
    ($services:expr) => {{
        let services: noticeboard::AppServices = $services;
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(services.pool.clone())
                .app_data(services.credentials.clone())
                .app_data(services.notices.clone())
                .app_data(services.sessions.clone())
                .app_data(services.site.clone())
                .wrap(noticeboard::auth::SessionMiddleware)
                .wrap(actix_web::middleware::Logger::default())
                .configure(noticeboard::routes::config),
        )
        .await
    }};
}

pub fn cookie_value<B>(resp: &ServiceResponse<B>, name: &str) -> Option<String> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

pub fn flash_code<B>(resp: &ServiceResponse<B>) -> Option<String> {
    cookie_value(resp, FLASH_COOKIE)
}

pub fn location<B>(resp: &ServiceResponse<B>) -> Option<String> {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub async fn register<S, B>(app: &S, username: &str, password: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/register")
        .set_form([("username", username), ("password", password)])
        .to_request();
    test::call_service(app, req).await
}

pub async fn login<S, B>(app: &S, username: &str, password: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("username", username), ("password", password)])
        .to_request();
    test::call_service(app, req).await
}

/// Registers `username` and logs in, returning the session cookie.
pub async fn sign_up<S, B>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = register(app, username, password).await;
    assert_eq!(resp.status(), StatusCode::FOUND, "registration of {username} failed");

    let resp = login(app, username, password).await;
    assert_eq!(resp.status(), StatusCode::FOUND, "login of {username} failed");
    let token = cookie_value(&resp, SESSION_COOKIE).expect("login should set a session cookie");
    Cookie::new(SESSION_COOKIE, token)
}
