//! API Routes
//!
//! Configures the Axum router with all cache admin endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    flush_handler, forget_handler, forget_many_handler, forget_module_handler,
    forget_pattern_handler, generate_key_handler, get_handler, health_handler, put_handler,
    refresh_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/keys", put(put_handler))
        .route("/keys/generate", post(generate_key_handler))
        .route("/keys/:key", get(get_handler).delete(forget_handler))
        .route("/keys/:key/refresh", post(refresh_handler))
        .route("/invalidate/keys", post(forget_many_handler))
        .route("/invalidate/pattern", post(forget_pattern_handler))
        .route("/modules/:module", delete(forget_module_handler))
        .route("/flush", post(flush_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
