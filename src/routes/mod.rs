pub mod health;
pub mod notices;
pub mod pages;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(pages::index)
        .service(pages::register_form)
        .service(pages::register)
        .service(pages::login_form)
        .service(pages::login)
        .service(pages::logout)
        .service(pages::noticeboard)
        .service(notices::get_notices)
        .service(notices::create_notice)
        .service(notices::edit_notice)
        .service(notices::delete_notice);
}
