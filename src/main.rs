//! Jokebox server binary.

use anyhow::Context;
use jokebox::auth::{AuthService, SessionCodec};
use jokebox::db::Store;
use jokebox::{api, AppConfig, AppState};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load("jokebox.toml").context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing secrets abort here, before anything listens.
    let secrets = config.session_secrets().context("Session secrets")?;
    let codec = SessionCodec::new(&secrets).context("Session codec")?;

    if let Some(parent) = Path::new(&config.database.path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }
    }

    let store = Arc::new(
        Store::new_local(&config.database.path)
            .await
            .context("Failed to open database")?,
    );

    let auth = Arc::new(AuthService::new(codec, store.clone()));

    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        auth,
    };

    let app = api::create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("jokebox listening on {addr}");
    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}
