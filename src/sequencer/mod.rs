//! Command Sequencer Module
//!
//! Serializes every cache operation through a single worker task.
//!
//! # Components
//! - `CacheHandle`: cloneable API that queues commands and awaits replies
//! - Worker: owns the store and the operation log, executes one command at
//!   a time in queue order

mod command;
mod handle;
mod worker;

pub(crate) use command::Command;
pub use handle::CacheHandle;
