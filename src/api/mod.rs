//! API Module
//!
//! HTTP adapter over the cache engine.
//!
//! # Endpoints
//! - `PUT /cache/put` - Store a key-value pair
//! - `GET /cache/get` - Retrieve a value by key
//! - `DELETE /cache/del` - Delete a key
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
