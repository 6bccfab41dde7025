use referent_server::{AppState, DEFAULT_ADDR, router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("referent_server=info,referent_core=info,tower_http=info")),
        )
        .init();

    let addr = std::env::var("REFERENT_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let state = AppState::from_env()?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "referent server listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
