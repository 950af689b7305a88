use std::net::SocketAddr;

use kunlun_agent::config::{client_id, parse_port, DEFAULT_PORT};
use kunlun_agent::http::router;
use kunlun_agent::state::{AppState, Identity};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if std::env::args().any(|a| a == "-h" || a == "--help") {
        println!("Usage: kunlun_agent [--port PORT|-p PORT]");
        return Ok(());
    }
    let port = parse_port(std::env::args(), DEFAULT_PORT);

    let identity = Identity::detect(client_id());
    info!(machine_id = %identity.machine_id, hostname = %identity.hostname, "host identity");
    let state = AppState::new(identity);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("kunlun agent listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
