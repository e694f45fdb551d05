use actix_web::web;
use sqlx::SqlitePool;

use crate::{
    auth::{CredentialStore, SessionManager},
    notices::{NoticeService, NoticeStore},
    views::Site,
};

/// The shared handles every worker registers as app data.
#[derive(Clone)]
pub struct AppServices {
    pub pool: web::Data<SqlitePool>,
    pub credentials: web::Data<CredentialStore>,
    pub notices: web::Data<NoticeService>,
    pub sessions: web::Data<SessionManager>,
    pub site: web::Data<Site>,
}

impl AppServices {
    pub fn new(pool: SqlitePool, sessions: SessionManager, bcrypt_cost: u32) -> Self {
        Self {
            credentials: web::Data::new(CredentialStore::new(pool.clone(), bcrypt_cost)),
            notices: web::Data::new(NoticeService::new(NoticeStore::new(pool.clone()))),
            pool: web::Data::new(pool),
            sessions: web::Data::new(sessions),
            site: web::Data::new(Site::default()),
        }
    }

    pub fn with_site(mut self, site: Site) -> Self {
        self.site = web::Data::new(site);
        self
    }
}
