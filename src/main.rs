// src/main.rs
use anyhow::{anyhow, Result as AnyhowResult};
use balances_api::api::{self, AppState};
use balances_api::config::Settings;
use dotenvy::dotenv;
use ethers::providers::{Http, Provider};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> AnyhowResult<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let settings = Settings::from_env()?;
    settings.validate().map_err(|message| anyhow!(message))?;

    let provider = Arc::new(Provider::<Http>::try_from(settings.rpc_url.as_str())?);

    let state = Arc::new(AppState {
        client: provider,
        format: settings.format,
    });
    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server is up at http://localhost:{}", settings.port);
    axum::serve(listener, app).await?;

    Ok(())
}
