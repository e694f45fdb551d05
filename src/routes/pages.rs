//! Browser-facing routes. Failures end in a redirect with a flash message rather
//! than a JSON error.

use actix_web::{
    cookie::{Cookie, SameSite},
    get, http::header, post, web, HttpRequest, HttpResponse,
};

use crate::{
    auth::{AuthenticatedUser, CredentialStore, SessionManager, SESSION_COOKIE},
    error::AppError,
    flash::{self, Flash},
    models::Credentials,
    notices::NoticeService,
    views::{self, Site},
};

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

fn session_removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// Landing page, or straight to the board for logged-in users.
#[get("/")]
pub async fn index(
    req: HttpRequest,
    user: Option<AuthenticatedUser>,
    site: web::Data<Site>,
) -> Result<HttpResponse, AppError> {
    if user.is_some() {
        return Ok(flash::redirect("/noticeboard", None));
    }
    let pending = Flash::from_request(&req);
    Ok(flash::page(views::landing(&site, pending)?, pending))
}

#[get("/register")]
pub async fn register_form(
    req: HttpRequest,
    site: web::Data<Site>,
) -> Result<HttpResponse, AppError> {
    let pending = Flash::from_request(&req);
    Ok(flash::page(views::register(&site, pending)?, pending))
}

/// Creates the account and sends the user to the login page.
#[post("/register")]
pub async fn register(
    credentials: web::Data<CredentialStore>,
    form: web::Form<Credentials>,
) -> Result<HttpResponse, AppError> {
    match credentials.register(&form).await {
        Ok(_) => Ok(flash::redirect("/login", Some(Flash::Registered))),
        Err(AppError::DuplicateUsername) => {
            Ok(flash::redirect("/register", Some(Flash::UsernameTaken)))
        }
        Err(AppError::ValidationError(_)) => {
            Ok(flash::redirect("/register", Some(Flash::RegistrationInvalid)))
        }
        Err(e) => Err(e),
    }
}

#[get("/login")]
pub async fn login_form(req: HttpRequest, site: web::Data<Site>) -> Result<HttpResponse, AppError> {
    let pending = Flash::from_request(&req);
    Ok(flash::page(views::login(&site, pending)?, pending))
}

/// Checks the credentials and starts a session.
#[post("/login")]
pub async fn login(
    credentials: web::Data<CredentialStore>,
    sessions: web::Data<SessionManager>,
    form: web::Form<Credentials>,
) -> Result<HttpResponse, AppError> {
    let user_id = match credentials.verify(&form.username, &form.password).await {
        Ok(user_id) => user_id,
        Err(AppError::InvalidCredentials) => {
            log::info!("failed login for {:?}", form.username);
            return Ok(flash::redirect("/login", Some(Flash::InvalidCredentials)));
        }
        Err(e) => return Err(e),
    };

    let token = sessions.create(user_id).await?;
    log::info!("{} logged in", form.username);

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/noticeboard"))
        .cookie(session_cookie(token))
        .cookie(Flash::LoggedIn.cookie())
        .finish())
}

/// Ends the session named by the cookie, if any. Safe to call repeatedly.
#[get("/logout")]
pub async fn logout(
    req: HttpRequest,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        sessions.destroy(cookie.value()).await?;
    }

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(session_removal_cookie())
        .cookie(Flash::LoggedOut.cookie())
        .finish())
}

#[get("/noticeboard")]
pub async fn noticeboard(
    req: HttpRequest,
    user: Option<AuthenticatedUser>,
    credentials: web::Data<CredentialStore>,
    notices: web::Data<NoticeService>,
    site: web::Data<Site>,
) -> Result<HttpResponse, AppError> {
    let Some(AuthenticatedUser(user_id)) = user else {
        return Ok(flash::redirect("/login", Some(Flash::LoginRequired)));
    };
    let Some(account) = credentials.find(user_id).await? else {
        return Ok(flash::redirect("/login", Some(Flash::LoginRequired)));
    };

    let listing = notices.list(user_id).await?;
    let pending = Flash::from_request(&req);
    Ok(flash::page(
        views::noticeboard(&site, &account.username, &listing, pending)?,
        pending,
    ))
}
