use std::net::SocketAddr;

use coffee_teams::api::{AppState, create_router};
use coffee_teams::config::ConfigLoader;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; RUST_LOG selects the level.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let config = ConfigLoader::from_env()?;
    let state = AppState::from_config(&config)?;
    let router = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        addr = %addr,
        hr = %config.hr.base_url(),
        strategy = ?config.grouping.strategy,
        "coffee team service listening"
    );
    axum::serve(listener, router).await?;
    Ok(())
}
