//! Ring Cache - A bounded in-memory key/value cache
//!
//! Keys are placed in a hashed slot space, evicted in insertion order when
//! capacity is exceeded, and recovered from an append-only operation log.
//! All operations run through a single command sequencer.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod oplog;
pub mod sequencer;

pub use api::AppState;
pub use config::Config;
pub use error::{CacheError, Result};
pub use sequencer::CacheHandle;
