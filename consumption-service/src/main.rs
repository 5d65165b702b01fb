use anyhow::Result;
use consumption_service::{
    cache::RedisConsumptionCache,
    config::AppConfig,
    metrics_server,
    observability,
    routes::{self, AppState},
    store::MongoConsumptionStore,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // One Ctrl-C stops the API listener and the metrics listener.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_ctrl_c().await;
        let _ = shutdown_tx.send(true);
    });

    // Start metrics server if configured
    let metrics_task = match &cfg.metrics {
        Some(metrics_cfg) => Some(
            metrics_server::spawn(&metrics_cfg.bind_addr, shutdown_requested(shutdown_rx.clone()))
                .await?,
        ),
        None => None,
    };

    // Both handles are opened once and shared by every request.
    let cache = RedisConsumptionCache::connect(&cfg.cache).await?;
    let store = MongoConsumptionStore::connect(&cfg.mongodb).await?;
    let app = routes::router(AppState::new(Arc::new(store), Arc::new(cache)));

    let addr: SocketAddr = cfg
        .http
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid http.bind_addr: {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "consumption service listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_requested(shutdown_rx))
        .await?;

    if let Some(task) = metrics_task {
        task.await?;
    }

    tracing::info!("consumption service stopped");
    Ok(())
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

async fn shutdown_requested(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}
