//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::backend::MemoryBackend;
use crate::cache::{CacheEntry, CacheFacade, StatsSnapshot, Ttl};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    ForgetManyRequest, ForgetManyResponse, GenerateKeyRequest, GetResponse, HealthResponse,
    KeyResponse, OperationResponse, PatternRequest, PutRequest, RefreshRequest,
};

/// Application state shared across all handlers.
///
/// The facade is what handlers use; the backend handle is kept for the
/// background purge task.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheFacade>,
    pub backend: Arc<MemoryBackend>,
}

impl AppState {
    /// Creates a new AppState over the given backend.
    pub fn new(backend: MemoryBackend, namespace: impl Into<String>) -> Self {
        let backend = Arc::new(backend);
        let cache = CacheFacade::new(backend.clone(), namespace);
        Self {
            cache: Arc::new(cache),
            backend,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(MemoryBackend::from_config(config), config.namespace.clone())
    }
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.driver()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.cache.stats())
}

/// Handler for POST /keys/generate
pub async fn generate_key_handler(
    State(state): State<AppState>,
    Json(req): Json<GenerateKeyRequest>,
) -> Result<Json<KeyResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let key = state
        .cache
        .generate_key(&req.module, &req.identifier, &req.params);
    Ok(Json(KeyResponse::new(key)))
}

/// Handler for PUT /keys
pub async fn put_handler(
    State(state): State<AppState>,
    Json(req): Json<PutRequest>,
) -> Result<Json<OperationResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.unwrap_or_default();
    let stored = state.cache.put(&req.key, &req.value, ttl);
    Ok(Json(OperationResponse::new(req.key, stored, "Put")))
}

/// Handler for GET /keys/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let entry: CacheEntry<Value> = state
        .cache
        .get_entry(&key)
        .ok_or_else(|| ApiError::NotFound(key.clone()))?;

    Ok(Json(GetResponse {
        key,
        ttl_remaining_secs: entry.ttl_remaining().as_secs(),
        cached_at: entry.cached_at.to_rfc3339(),
        expires_at: entry.expires_at.to_rfc3339(),
        value: entry.value,
    }))
}

/// Handler for POST /keys/:key/refresh
///
/// Body is optional; without one the default tier is used.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Option<Json<RefreshRequest>>,
) -> Result<Json<OperationResponse>> {
    let ttl: Ttl = body
        .and_then(|Json(req)| req.ttl)
        .unwrap_or_default();

    if !state.cache.refresh(&key, ttl) {
        return Err(ApiError::NotFound(key));
    }
    Ok(Json(OperationResponse::new(key, true, "Refresh")))
}

/// Handler for DELETE /keys/:key
pub async fn forget_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<OperationResponse> {
    let removed = state.cache.forget(&key);
    Json(OperationResponse::new(key, removed, "Forget"))
}

/// Handler for POST /invalidate/keys
pub async fn forget_many_handler(
    State(state): State<AppState>,
    Json(req): Json<ForgetManyRequest>,
) -> Result<Json<ForgetManyResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let results = state.cache.forget_many(&req.keys);
    Ok(Json(ForgetManyResponse::new(results)))
}

/// Handler for POST /invalidate/pattern
pub async fn forget_pattern_handler(
    State(state): State<AppState>,
    Json(req): Json<PatternRequest>,
) -> Result<Json<OperationResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let success = state.cache.forget_by_pattern(&req.pattern);
    Ok(Json(OperationResponse::new(req.pattern, success, "Invalidate pattern")))
}

/// Handler for DELETE /modules/:module
pub async fn forget_module_handler(
    State(state): State<AppState>,
    Path(module): Path<String>,
) -> Json<OperationResponse> {
    let success = state.cache.forget_module(&module);
    Json(OperationResponse::new(module, success, "Invalidate module"))
}

/// Handler for POST /flush
pub async fn flush_handler(State(state): State<AppState>) -> Json<OperationResponse> {
    let success = state.cache.flush();
    Json(OperationResponse::new("*", success, "Flush"))
}
