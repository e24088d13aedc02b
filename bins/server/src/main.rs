//! Bankline API Server
//!
//! Main entry point for the Bankline backend service.

mod seed;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bankline_api::{AppState, create_router};
use bankline_core::auth::PasswordService;
use bankline_db::{AccountRepository, connect, migration::Migrator};
use bankline_shared::{AppConfig, JwtService};

/// Command line options.
#[derive(Debug, Parser)]
#[command(name = "bankline")]
#[command(about = "Bankline account API server", long_about = None)]
struct Cli {
    /// Populate the database with demo accounts before serving.
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().context("Error loading .env file")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bankline=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database and make sure the schema exists
    let db = connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("Failed to run migrations")?;
    info!("Database ready");

    // Account numbers come from the database sequence, so restarts and
    // deletes never hand out a number twice
    let repository = AccountRepository::new(db);

    let password_service = PasswordService::new(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )
    .context("Invalid password hashing parameters")?;

    let state = AppState {
        accounts: Arc::new(repository),
        jwt_service: Arc::new(JwtService::new(&config.jwt.secret)),
        password_service: Arc::new(password_service),
    };

    if cli.seed {
        seed::seed_accounts(&state)
            .await
            .context("Failed to seed database")?;
    }

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
