//! Askama templates for the page routes. Templates live in `templates/` and
//! escape every interpolated value as HTML.

use askama::Template;
use chrono::{Datelike, Utc};

use crate::{config::DEFAULT_SITE_AUTHOR, error::AppError, flash::Flash, models::NoticeView};

/// Site-wide details shown in every page footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub author: String,
}

impl Site {
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
        }
    }
}

impl Default for Site {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_AUTHOR)
    }
}

/// What `base.html` needs: the page title, the footer and a pending flash.
struct Frame<'a> {
    title: &'a str,
    author: &'a str,
    year: i32,
    flash: Option<&'static str>,
}

impl<'a> Frame<'a> {
    fn new(site: &'a Site, title: &'a str, flash: Option<Flash>) -> Self {
        Self {
            title,
            author: &site.author,
            year: Utc::now().year(),
            flash: flash.map(Flash::message),
        }
    }
}

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingPage<'a> {
    frame: Frame<'a>,
}

#[derive(Template)]
#[template(path = "credentials.html")]
struct CredentialsPage<'a> {
    frame: Frame<'a>,
    action: &'a str,
    submit: &'a str,
    other_prompt: &'a str,
    other_href: &'a str,
    other_label: &'a str,
}

#[derive(Template)]
#[template(path = "noticeboard.html")]
struct NoticeboardPage<'a> {
    frame: Frame<'a>,
    username: &'a str,
    notices: &'a [NoticeView],
}

pub fn landing(site: &Site, flash: Option<Flash>) -> Result<String, AppError> {
    let page = LandingPage {
        frame: Frame::new(site, "Noticeboard", flash),
    };
    Ok(page.render()?)
}

pub fn register(site: &Site, flash: Option<Flash>) -> Result<String, AppError> {
    let page = CredentialsPage {
        frame: Frame::new(site, "Register", flash),
        action: "/register",
        submit: "Register",
        other_prompt: "Already registered?",
        other_href: "/login",
        other_label: "Log in",
    };
    Ok(page.render()?)
}

pub fn login(site: &Site, flash: Option<Flash>) -> Result<String, AppError> {
    let page = CredentialsPage {
        frame: Frame::new(site, "Log in", flash),
        action: "/login",
        submit: "Log in",
        other_prompt: "No account yet?",
        other_href: "/register",
        other_label: "Register",
    };
    Ok(page.render()?)
}

pub fn noticeboard(
    site: &Site,
    username: &str,
    notices: &[NoticeView],
    flash: Option<Flash>,
) -> Result<String, AppError> {
    let page = NoticeboardPage {
        frame: Frame::new(site, "Noticeboard", flash),
        username,
        notices,
    };
    Ok(page.render()?)
}
