//! Server: reads settings from the environment (and `.env`), connects the store, serves the API.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use tree_store::{app, AppState, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tree_store=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let addr = settings.bind_addr();
    let state = AppState::connect(settings).await?;

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
