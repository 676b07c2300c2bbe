//! Configuration Module
//!
//! Handles loading and validating engine and server configuration from
//! environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{CacheError, Result};

/// Engine and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of resident entries (eviction list bound)
    pub capacity: usize,
    /// Number of slots in the hashed slot space
    pub slot_space_size: usize,
    /// Location of the append-only operation log
    pub log_path: PathBuf,
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of commands waiting in the sequencer queue
    pub queue_capacity: usize,
    /// Seconds allowed for draining queued commands at shutdown
    pub shutdown_timeout: u64,
    /// Whether every log append is followed by an fsync
    pub sync_writes: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CAPACITY` - Maximum resident entries (default: 2)
    /// - `SLOT_SPACE_SIZE` - Slot space size (default: 100)
    /// - `LOG_PATH` - Operation log file (default: logs/cache_log.txt)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `QUEUE_CAPACITY` - Sequencer queue bound (default: 1024)
    /// - `SHUTDOWN_TIMEOUT` - Drain deadline in seconds (default: 60)
    /// - `SYNC_WRITES` - fsync after each append (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env_or("CAPACITY", defaults.capacity),
            slot_space_size: env_or("SLOT_SPACE_SIZE", defaults.slot_space_size),
            log_path: env::var("LOG_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.log_path),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            queue_capacity: env_or("QUEUE_CAPACITY", defaults.queue_capacity),
            shutdown_timeout: env_or("SHUTDOWN_TIMEOUT", defaults.shutdown_timeout),
            sync_writes: env_or("SYNC_WRITES", defaults.sync_writes),
        }
    }

    /// Creates a config for the given bounds, keeping every other default.
    pub fn with_bounds(
        capacity: usize,
        slot_space_size: usize,
        log_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            capacity,
            slot_space_size,
            log_path: log_path.into(),
            ..Self::default()
        }
    }

    /// Rejects configurations the engine cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.slot_space_size < self.capacity {
            return Err(CacheError::InvalidConfig(format!(
                "slot_space_size ({}) must be at least capacity ({})",
                self.slot_space_size, self.capacity
            )));
        }
        if self.slot_space_size > i32::MAX as usize {
            return Err(CacheError::InvalidConfig(format!(
                "slot_space_size must not exceed {}",
                i32::MAX
            )));
        }
        if self.queue_capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "queue_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 2,
            slot_space_size: 100,
            log_path: PathBuf::from("logs/cache_log.txt"),
            server_port: 8080,
            queue_capacity: 1024,
            shutdown_timeout: 60,
            sync_writes: true,
        }
    }
}
