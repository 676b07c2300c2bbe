//! Cache Module
//!
//! In-memory engine state: hashed slot placement, bounded insertion-order
//! eviction, and the store that keeps the two in step.

mod entry;
mod eviction;
mod slots;
mod stats;
mod store;


// Re-export public types
pub use entry::{validate_key, Entry};
pub use eviction::EvictionList;
pub use slots::{home_slot, string_hash, SlotTable};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
