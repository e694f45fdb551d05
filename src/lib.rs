#![doc = "The `noticeboard` library crate."]
#![doc = ""]
#![doc = "Accounts, sessions, notices and the HTTP routes around them. The binary"]
#![doc = "(`main.rs`) reads the configuration, opens the database and serves"]
#![doc = "`routes::config` behind `auth::SessionMiddleware`."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod models;
pub mod notices;
pub mod routes;
pub mod state;
pub mod views;

pub use error::AppError;
pub use state::AppServices;
