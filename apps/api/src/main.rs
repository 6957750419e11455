mod analysis;
mod catalog;
mod config;
mod errors;
mod llm_client;
mod mentor;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::CareerCatalog;
use crate::config::Config;
use crate::llm_client::{GeminiClient, TextGenerator};
use crate::mentor::Mentor;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillQuest API v{}", env!("CARGO_PKG_VERSION"));

    let catalog = CareerCatalog::load(&config.careers_path)?;
    info!("{} careers available", catalog.career_count());

    let mentor = match &config.gemini_key {
        Some(key) => {
            let client = GeminiClient::new(key.clone(), config.gemini_api_base.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Mentor::new(Some(Arc::new(client) as Arc<dyn TextGenerator>))
        }
        None => {
            warn!("GEMINI_KEY not set; AI mentor replies will report missing configuration");
            Mentor::new(None)
        }
    };
    info!(
        "AI mentor enabled: {}",
        if mentor.is_configured() { "yes" } else { "no" }
    );

    let state = AppState {
        catalog: Arc::new(catalog),
        mentor,
    };

    let app = build_router(state, &config.index_path)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
