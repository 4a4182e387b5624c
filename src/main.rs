use std::net::SocketAddr;
use std::sync::Arc;

use rust_crm::api;
use rust_crm::config::Config;
use rust_crm::handlers::AppState;
use rust_crm::registry::Registry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the HTTP front-end.
///
/// Initializes logging, loads the configuration, builds the single registry
/// this process serves and hands it to the router. All customer data lives in
/// memory and is gone when the process exits.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_crm=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let app_state = Arc::new(AppState::new(Registry::new(), config.clone()));
    tracing::info!("In-memory customer registry initialized");

    let app = api::router(app_state)?;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
