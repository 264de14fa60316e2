use anyhow::Context;

use stockhold_api::{app, config::ApiConfig};
use stockhold_infra::ExpirySweeper;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockhold_observability::init();

    let config = ApiConfig::from_env()?;
    let service = app::services::build_services().context("failed to seed inventory")?;

    let sweeper = ExpirySweeper::default()
        .with_interval(config.sweep_interval)
        .with_hold_ttl(config.hold_ttl)
        .spawn("expiry-sweeper", service.clone())
        .context("failed to spawn expiry sweeper")?;

    let app = app::build_app(service);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    app::services::stop_sweeper(sweeper).await?;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}
