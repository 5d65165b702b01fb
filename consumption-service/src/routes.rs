use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use consumption_client::domain::EnergyConsumption;

use crate::{
    cache::{ConsumptionCache, CONSUMPTION_LIST_KEY, CONSUMPTION_LIST_TTL},
    error::ServiceError,
    store::ConsumptionStore,
};

/// Connection handles shared by every request. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ConsumptionStore>,
    pub cache: Arc<dyn ConsumptionCache>,
}

impl AppState {
    pub fn new(store: Arc<dyn ConsumptionStore>, cache: Arc<dyn ConsumptionCache>) -> Self {
        Self { store, cache }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/consumo", get(list_consumption).post(create_consumption))
        .with_state(state)
}

async fn health() -> Json<&'static str> {
    Json("Service is running")
}

async fn create_consumption(
    State(state): State<AppState>,
    payload: Result<Json<EnergyConsumption>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Json(mut record) = payload.map_err(|e| ServiceError::Unknown(e.body_text()))?;

    let id = state.store.insert_one(&record).await?;
    record.id = Some(id.clone());

    metrics::counter!("consumption_created_total").increment(1);
    tracing::debug!(id = %id, "stored consumption record");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/consumo/{id}"))],
        Json(record),
    ))
}

/// Cache-aside read of the whole collection.
///
/// A cache fault is returned as-is; the store is only consulted on a miss.
/// Writes never invalidate the cached list, so it may lag by up to the TTL.
async fn list_consumption(
    State(state): State<AppState>,
) -> Result<Json<Vec<EnergyConsumption>>, ServiceError> {
    let cached = state.cache.get(CONSUMPTION_LIST_KEY).await?;

    if let Some(blob) = cached.filter(|b| !b.is_empty()) {
        let records: Vec<EnergyConsumption> =
            serde_json::from_str(&blob).map_err(|e| ServiceError::Unknown(e.to_string()))?;

        metrics::counter!("consumption_cache_hits_total").increment(1);
        tracing::info!(count = records.len(), "consumption list served from cache");
        return Ok(Json(records));
    }

    metrics::counter!("consumption_cache_misses_total").increment(1);
    tracing::info!("consumption list not cached, querying document store");

    let records = state.store.find_all().await?;
    let blob = serde_json::to_string(&records).map_err(|e| ServiceError::Unknown(e.to_string()))?;
    state
        .cache
        .set_with_expiry(CONSUMPTION_LIST_KEY, &blob, CONSUMPTION_LIST_TTL)
        .await?;

    tracing::info!(count = records.len(), "consumption list loaded from store and cached");
    Ok(Json(records))
}
