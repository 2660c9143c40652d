use std::net::SocketAddr;
use std::sync::Arc;

use serial_verify::config::Config;
use serial_verify::http::{router, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "serial_verify=info".into()),
        )
        .json()
        .init();

    info!("Starting Serial Verify Service");

    let config = Config::from_env();
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let state = Arc::new(AppState::new(config));
    let app = router(state);

    info!("Serial Verify Service listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
