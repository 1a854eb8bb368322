use std::sync::Arc;

use anyhow::Context;

use ledgercast_api::{app, config::ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("invalid configuration")?;
    ledgercast_observability::init(config.log_format);

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_file = %config.data_file.display(),
        subscriber_buffer = config.subscriber_buffer,
        "starting ledgercast"
    );

    let services = Arc::new(app::services::build_services(&config).await?);
    let router = app::build_app(services.clone());

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(services))
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal(services: Arc<app::services::BankService>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    let closed = services.shutdown();
    tracing::info!(closed, "shutdown requested");
}
