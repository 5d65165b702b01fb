use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Faults surfaced by the store and cache clients.
///
/// Every variant turns into a bare `500`; the detail only reaches the log.
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("store error: {0}")]
    Store(String),
    #[error("cache error: {0}")]
    Cache(String),
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl ServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Store(_) => "store",
            Self::Cache(_) => "cache",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match &self {
            Self::Store(e) => tracing::error!(error = %e, "failed to reach document store"),
            Self::Cache(e) => tracing::error!(error = %e, "failed to reach cache"),
            Self::Unknown(e) => tracing::error!(error = %e, "unexpected error handling request"),
        }
        metrics::counter!("consumption_backend_faults_total", "kind" => self.kind()).increment(1);

        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
