//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - `AccountRepository`, the PostgreSQL `AccountStore`
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::AccountRepository;

use bankline_shared::config::DatabaseConfig;
use sea_orm::{Database, DatabaseConnection, DbErr, RuntimeErr, SqlxPostgresConnector};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use tracing::info;

/// Establishes a pooled connection from discrete database settings and pings it.
///
/// # Errors
///
/// Returns an error if the SSL mode is unknown or the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let ssl_mode: PgSslMode = config
        .ssl_mode
        .parse()
        .map_err(|e: sqlx::Error| DbErr::Custom(format!("invalid ssl mode: {e}")))?;

    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name)
        .ssl_mode(ssl_mode);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_with(options)
        .await
        .map_err(|e| DbErr::Conn(RuntimeErr::Internal(e.to_string())))?;

    let db = SqlxPostgresConnector::from_sqlx_postgres_pool(pool);
    db.ping().await?;
    info!(host = %config.host, database = %config.name, "Database connection established");

    Ok(db)
}

/// Establishes a connection from a database URL.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_url(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
