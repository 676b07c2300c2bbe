//! Request and Response models for the cache server API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! deserializing query parameters and serializing response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{KeyParams, PutParams};
pub use responses::{
    DeleteResponse, ErrorResponse, GetResponse, HealthResponse, PutResponse, StatsResponse,
};
