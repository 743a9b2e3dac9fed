mod config;
mod drafts;
mod errors;
mod letters;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::drafts::credentials::CredentialVault;
use crate::drafts::session::DraftRegistry;
use crate::drafts::sweep::spawn_idle_sweep;
use crate::letters::store::LetterStore;
use crate::llm_client::ChatCompletionClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Letterdesk API v{}", env!("CARGO_PKG_VERSION"));

    let provider = ChatCompletionClient::new(
        &config.openai_base_url,
        Duration::from_secs(config.llm_request_timeout_secs),
    )?;
    info!(
        "Completion client initialized (model: {}, endpoint: {})",
        llm_client::MODEL,
        config.openai_base_url
    );

    let letters = if config.seed_sample_letters {
        LetterStore::seeded(Utc::now())
    } else {
        LetterStore::default()
    };
    info!("Letter store ready with {} letter(s)", letters.list().await.len());

    let drafts = DraftRegistry::default();
    let credentials = CredentialVault::default();
    if config.draft_idle_ttl_secs > 0 {
        let _sweep = spawn_idle_sweep(
            drafts.clone(),
            credentials.clone(),
            Duration::from_secs(config.draft_idle_ttl_secs),
        );
        info!("Idle drafts close after {}s", config.draft_idle_ttl_secs);
    }

    let state = AppState {
        letters,
        drafts,
        credentials,
        provider: Arc::new(provider),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front end has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
