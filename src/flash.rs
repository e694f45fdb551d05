//! One-shot messages for the page routes.
//!
//! A redirect sets the `flash` cookie to a message code; the next page render
//! shows the message and clears the cookie. Only codes travel in the cookie, so
//! the text shown is always one of the messages below.

use actix_web::{
    cookie::{Cookie, SameSite},
    http::header,
    HttpRequest, HttpResponse,
};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Registered,
    UsernameTaken,
    RegistrationInvalid,
    LoggedIn,
    InvalidCredentials,
    LoggedOut,
    LoginRequired,
}

const ALL: [Flash; 7] = [
    Flash::Registered,
    Flash::UsernameTaken,
    Flash::RegistrationInvalid,
    Flash::LoggedIn,
    Flash::InvalidCredentials,
    Flash::LoggedOut,
    Flash::LoginRequired,
];

impl Flash {
    pub fn code(self) -> &'static str {
        match self {
            Flash::Registered => "registered",
            Flash::UsernameTaken => "username-taken",
            Flash::RegistrationInvalid => "registration-invalid",
            Flash::LoggedIn => "logged-in",
            Flash::InvalidCredentials => "invalid-credentials",
            Flash::LoggedOut => "logged-out",
            Flash::LoginRequired => "login-required",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        ALL.into_iter().find(|flash| flash.code() == code)
    }

    pub fn message(self) -> &'static str {
        match self {
            Flash::Registered => "Registration successful! Please log in.",
            Flash::UsernameTaken => "Username already exists. Please choose a different one.",
            Flash::RegistrationInvalid => {
                "Please choose a username (up to 80 characters) and a password."
            }
            Flash::LoggedIn => "Login successful!",
            Flash::InvalidCredentials => "Invalid username or password.",
            Flash::LoggedOut => "You have been logged out.",
            Flash::LoginRequired => "Please log in to view the noticeboard.",
        }
    }

    /// The pending message on this request, if any.
    pub fn from_request(req: &HttpRequest) -> Option<Self> {
        req.cookie(FLASH_COOKIE)
            .and_then(|cookie| Self::from_code(cookie.value()))
    }

    pub fn cookie(self) -> Cookie<'static> {
        Cookie::build(FLASH_COOKIE, self.code())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish()
    }
}

/// Expires the flash cookie once its message has been shown.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// `302 Found` to `location`, queueing `flash` for the next page.
pub fn redirect(location: &str, flash: Option<Flash>) -> HttpResponse {
    let mut response = HttpResponse::Found();
    response.insert_header((header::LOCATION, location));
    if let Some(flash) = flash {
        response.cookie(flash.cookie());
    }
    response.finish()
}

/// `200 OK` with an HTML body. Clears the flash cookie when the page consumed one.
pub fn page(html: String, consumed: Option<Flash>) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    response.content_type("text/html; charset=utf-8");
    if consumed.is_some() {
        response.cookie(removal_cookie());
    }
    response.body(html)
}
