//! API Handlers
//!
//! HTTP request handlers translating each endpoint into a cache command.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, KeyParams, PutParams, PutResponse,
    StatsResponse,
};
use crate::sequencer::CacheHandle;

/// Application state shared across all handlers.
///
/// The handle is already cheap to clone and serializes access itself, so no
/// lock is needed around it.
#[derive(Clone)]
pub struct AppState {
    pub cache: CacheHandle,
}

impl AppState {
    /// Creates a new AppState around a running cache.
    pub fn new(cache: CacheHandle) -> Self {
        Self { cache }
    }
}

/// Handler for PUT /cache/put?key=..&value=..
pub async fn put_handler(
    State(state): State<AppState>,
    Query(params): Query<PutParams>,
) -> Result<Json<PutResponse>> {
    if let Some(error_msg) = params.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.cache.put(params.key.clone(), params.value).await?;

    Ok(Json(PutResponse::new(params.key)))
}

/// Handler for GET /cache/get?key=..
pub async fn get_handler(
    State(state): State<AppState>,
    Query(params): Query<KeyParams>,
) -> Result<Json<GetResponse>> {
    if let Some(error_msg) = params.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let value = state.cache.get(params.key.clone()).await?;

    Ok(Json(GetResponse::new(params.key, value)))
}

/// Handler for DELETE /cache/del?key=..
///
/// Succeeds whether or not the key was resident.
pub async fn delete_handler(
    State(state): State<AppState>,
    Query(params): Query<KeyParams>,
) -> Result<Json<DeleteResponse>> {
    if let Some(error_msg) = params.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.cache.del(params.key.clone()).await?;

    Ok(Json(DeleteResponse::new(params.key)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state.cache.stats().await?;
    Ok(Json(StatsResponse::from(stats)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
