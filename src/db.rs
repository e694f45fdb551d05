//! Connection pool setup. The schema in `schema.sql` is applied on every start;
//! every statement in it is idempotent.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Executor;

use crate::error::AppError;

const SCHEMA: &str = include_str!("../schema.sql");

/// Opens a pool for `database_url` and makes sure the tables exist.
///
/// An in-memory database lives and dies with its connection, so such pools are
/// pinned to a single connection that is never recycled.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new();
    if database_url.contains(":memory:") || database_url.contains("mode=memory") {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;
    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), AppError> {
    pool.execute(SCHEMA).await?;
    log::debug!("database schema is up to date");
    Ok(())
}
