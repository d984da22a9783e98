//! Generation proxy server.
//!
//! A small HTTP front for the generation gateway: it holds the provider
//! credential so browser frontends never see it, and exposes the two
//! generation operations as JSON endpoints.
//!
//! Usage:
//!   MOONSHOT_API_KEY=sk-... lenscore-server

mod routes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lenscore::MoonshotClient;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

// Generous enough for scripts with embedded base64 imagery in shot data
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real deployments set the environment directly
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new("info,lenscore=debug,lenscore_server=debug")
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = Arc::new(MoonshotClient::from_env()?);

    let app = Router::new()
        .route("/api/generate-storyboard", post(routes::generate_storyboard))
        .route("/api/regenerate-shot", post(routes::regenerate_shot))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(client);

    let bind_address =
        std::env::var("LENSCORE_BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "generation proxy listening");
    axum::serve(listener, app).await?;
    Ok(())
}
