//! NSGD API Server
//!
//! Main entry point for the ledger backend.

use std::sync::Arc;

use anyhow::Context;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nsgd_api::{AppState, create_router};
use nsgd_core::auth::OperatorAccount;
use nsgd_core::storage::{StorageConfig, StorageService};
use nsgd_db::{connect_with, migration::Migrator};
use nsgd_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nsgd=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    Migrator::up(&db, None).await?;
    info!("Migrations applied");

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        token_expires_secs: i64::try_from(config.jwt.token_expiry_secs)
            .context("jwt.token_expiry_secs out of range")?,
    });

    let operator = OperatorAccount::new(
        config.admin.username.clone(),
        config.admin.password_hash.clone(),
    );

    let storage = StorageService::from_config(StorageConfig::from_settings(&config.storage))?;
    info!(
        provider = storage.provider_name(),
        max_file_size = config.storage.max_file_size,
        "Upload storage configured"
    );

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        operator: Arc::new(operator),
        storage: Arc::new(storage),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
