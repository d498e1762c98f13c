// Main entry point for the KYC intake API server

use std::sync::Arc;

use anyhow::{Context, Result};
use intake::{
    CloudinaryBlobStore, DocumentExtractor, GeminiSummarizer, IntakePipeline, PostgresRecordStore,
    RecordStore,
};
use server_core::domains::auth::{JwtService, PgUserStore, UserStore};
use server_core::server::app::{build_app, AppState};
use server_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting KYC intake API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Stores run their own migrations on startup
    let record_store: Arc<dyn RecordStore> = Arc::new(
        PostgresRecordStore::from_pool(pool.clone())
            .await
            .context("Failed to initialize record store")?,
    );
    let users: Arc<dyn UserStore> = Arc::new(
        PgUserStore::from_pool(pool.clone())
            .await
            .context("Failed to initialize user store")?,
    );

    // Wire the intake pipeline to its live collaborators
    let pipeline = IntakePipeline::new(
        Arc::new(DocumentExtractor::new()),
        Arc::new(GeminiSummarizer::new(config.google_api_key.clone())),
        Arc::new(CloudinaryBlobStore::new(
            config.cloudinary_cloud_name.clone(),
            config.cloudinary_upload_preset.clone(),
        )),
        record_store.clone(),
    );

    let jwt = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));

    let app = build_app(AppState {
        pipeline,
        record_store,
        users,
        jwt,
    });

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
