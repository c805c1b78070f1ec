use health_tracker::{backend::BackendClient, load_storage, rollover, router, AppState, Config};
use std::net::SocketAddr;
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let store = load_storage(&config.data_path).await;
    let backend = BackendClient::new(config.api_url.clone(), config.api_timeout)?;
    info!(backend = backend.base_url(), "using health backend");

    let state = AppState::new(config.data_path.clone(), store, backend);
    if let Some(session) = state.current_session().await {
        info!(email = session.email(), "restored session");
    }

    let rollover_task = rollover::spawn(state.clone(), config.rollover_interval);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    rollover_task.abort();
    info!("stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
