use std::{future::Future, net::SocketAddr};

use axum::{extract::State, routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::task::JoinHandle;

/// `/metrics` rendered from the given recorder handle.
pub fn router(handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/metrics", get(render_metrics))
        .with_state(handle)
}

/// Install the global Prometheus recorder and serve it until `shutdown` resolves.
///
/// The listener is bound before returning so a bad address fails startup.
pub async fn spawn<F>(bind_addr: &str, shutdown: F) -> anyhow::Result<JoinHandle<()>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid metrics.bind_addr: {e}"))?;

    let handle = PrometheusBuilder::new().install_recorder()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "metrics endpoint listening");

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router(handle).into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
        {
            tracing::error!(error = %e, "metrics server error");
        }
    }))
}

async fn render_metrics(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn renders_counters_recorded_through_handle() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            metrics::counter!("consumption_cache_hits_total").increment(2);
        });

        let response = router(handle)
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("consumption_cache_hits_total 2"), "{text}");
    }

    #[tokio::test]
    async fn rejects_invalid_bind_addr() {
        let err = spawn("not-an-addr", async {}).await.unwrap_err();
        assert!(err.to_string().contains("invalid metrics.bind_addr"));
    }
}
