//! API Module
//!
//! HTTP handlers and routing for the cache admin API.
//!
//! # Endpoints
//! - `GET /health` - Health check
//! - `GET /stats` - Backend statistics
//! - `POST /keys/generate` - Build a key from module, identifier and params
//! - `PUT /keys` - Store a value with a TTL tier or minute count
//! - `GET /keys/:key` - Read a value with its envelope metadata
//! - `POST /keys/:key/refresh` - Rewrite a value with a fresh TTL
//! - `DELETE /keys/:key` - Forget a key
//! - `POST /invalidate/keys` - Forget several keys
//! - `POST /invalidate/pattern` - Forget keys containing a pattern
//! - `DELETE /modules/:module` - Forget every key of a module
//! - `POST /flush` - Empty the cache

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
