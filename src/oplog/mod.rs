//! Operation Log Module
//!
//! Durable, append-only record of accepted mutations and the replay that
//! rebuilds the cache from it at startup.
//!
//! The log is never compacted, so it grows with the number of mutations.

mod record;
mod replay;
mod writer;

pub use record::{Record, RecordError};
pub use replay::{replay, ReplayReport};
pub use writer::OpLog;
