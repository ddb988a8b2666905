//! DDS API Server
//!
//! Main entry point for the VAT return engine.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dds_api::{AppState, create_router};
use dds_core::returns::VatReturnService;
use dds_core::vat::StatutoryDueDate;
use dds_db::{LedgerRepository, VatReturnRepository, connect};
use dds_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dds=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let service = VatReturnService::new(
        Arc::new(VatReturnRepository::new(db.clone())),
        Arc::new(LedgerRepository::new(db)),
    )
    .with_due_date_policy(Arc::new(StatutoryDueDate::new(
        config.vat.due_day,
        config.vat.roll_weekends,
    )));
    info!(
        due_day = config.vat.due_day,
        roll_weekends = config.vat.roll_weekends,
        "VAT return service configured"
    );

    let app = create_router(AppState::new(service));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
