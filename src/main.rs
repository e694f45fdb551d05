use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};

use noticeboard::{
    auth::{SessionManager, SessionMiddleware},
    config::Config,
    db, routes,
    views::Site,
    AppServices,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let pool = db::connect(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;

    let sessions = SessionManager::for_backend(config.session_backend, pool.clone());
    let services = AppServices::new(pool, sessions, config.bcrypt_cost)
        .with_site(Site::new(config.site_author.clone()));

    log::info!(
        "starting noticeboard at {} (sessions: {:?})",
        config.server_url(),
        config.session_backend
    );

    let origin = config.server_url();
    HttpServer::new(move || {
        App::new()
            .app_data(services.pool.clone())
            .app_data(services.credentials.clone())
            .app_data(services.notices.clone())
            .app_data(services.sessions.clone())
            .app_data(services.site.clone())
            .wrap(SessionMiddleware)
            .wrap(
                Cors::default()
                    .allowed_origin(&origin)
                    .allow_any_method()
                    .allow_any_header()
                    .supports_credentials()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
