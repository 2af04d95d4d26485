//! sync-server — catalog & inventory reconciliation service
//!
//! Long-running companion process that:
//! - Authenticates and dispatches commerce webhook notifications
//! - Folds external catalog/inventory changes into the product store
//! - Detects and resolves divergences between local and external state

use sync_server::{AppState, Config, api};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sync_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting sync-server (env: {})", config.environment);

    let state = AppState::new(&config).await?;
    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("sync-server HTTP listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
