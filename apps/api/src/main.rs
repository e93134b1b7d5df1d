mod access;
mod auth;
mod config;
mod dashboard;
mod db;
mod errors;
mod extract;
mod extractors;
mod jobs;
mod llm_client;
mod models;
mod resumes;
mod routes;
mod state;
mod storage;
mod store;
mod suggestions;
#[cfg(test)]
mod test_support;
mod uploads;
mod users;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::JwtKeys;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::S3DocumentStore;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: startup fails on missing required env vars
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting NextDraft API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    let storage = S3DocumentStore::new(&config).await;
    info!("Document store initialized (bucket: {})", config.s3_bucket);

    let llm = GeminiClient::new(&config);
    info!("LLM client initialized (model: {})", llm.model());

    let state = AppState {
        store: Arc::new(PgStore::new(db)),
        storage: Arc::new(storage),
        llm: Arc::new(llm),
        jwt: JwtKeys::new(config.jwt_secret.as_bytes(), config.jwt_ttl_days),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
