//! Cache Handle
//!
//! Cloneable caller-side API. Every call is queued to the sequencer and
//! answered on a oneshot channel, so callers on any task observe one total
//! order of operations.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::oplog::{self, OpLog};
use crate::sequencer::worker::{spawn_sequencer, Sequencer};
use crate::sequencer::Command;

#[derive(Debug)]
struct Lifecycle {
    signal: Option<oneshot::Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

// == Cache Handle ==
/// Entry point to a running cache engine.
///
/// Cheap to clone; all clones feed the same sequencer.
#[derive(Debug, Clone)]
pub struct CacheHandle {
    commands: mpsc::Sender<Command>,
    lifecycle: Arc<Mutex<Lifecycle>>,
}

impl CacheHandle {
    // == Open ==
    /// Recovers state from the operation log and starts the sequencer.
    ///
    /// A missing or unreadable log yields an empty cache. Failing to open the
    /// log for appending is an error, since no mutation could be made durable.
    pub async fn open(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut store = CacheStore::new(config.capacity, config.slot_space_size);
        oplog::replay(&config.log_path, &mut store).await;

        let log = OpLog::open(&config.log_path, config.sync_writes)
            .await
            .map_err(CacheError::LogWrite)?;

        info!(
            "Cache engine ready: capacity={}, slot_space_size={}, log={}",
            config.capacity,
            config.slot_space_size,
            config.log_path.display()
        );
        Ok(Self::start(Sequencer::new(store, log), config.queue_capacity))
    }

    fn start(sequencer: Sequencer, queue_capacity: usize) -> Self {
        let (commands, queue) = mpsc::channel(queue_capacity);
        let (signal, shutdown) = oneshot::channel();
        let worker = spawn_sequencer(sequencer, queue, shutdown);

        Self {
            commands,
            lifecycle: Arc::new(Mutex::new(Lifecycle {
                signal: Some(signal),
                worker: Some(worker),
            })),
        }
    }

    // == Put ==
    /// Stores `value` under `key`, evicting the oldest entry if needed.
    ///
    /// Returns once the record is durable and the store updated.
    pub async fn put(&self, key: impl Into<String>, value: i64) -> Result<()> {
        let key = key.into();
        self.request(|reply| Command::Put { key, value, reply })
            .await?
    }

    // == Get ==
    /// Reads the value for `key`, or `NotFound` if it is not resident.
    pub async fn get(&self, key: impl Into<String>) -> Result<i64> {
        let key = key.into();
        self.request(|reply| Command::Get { key, reply }).await?
    }

    // == Del ==
    /// Removes `key`. Deleting an absent key is not an error.
    pub async fn del(&self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        self.request(|reply| Command::Del { key, reply }).await?
    }

    // == Stats ==
    pub async fn stats(&self) -> Result<CacheStats> {
        self.request(|reply| Command::Stats { reply }).await
    }

    /// Queues a command and waits for its reply.
    ///
    /// Waits for queue space when the queue is full.
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| CacheError::ShuttingDown)?;
        response.await.map_err(|_| CacheError::ShuttingDown)
    }

    // == Shutdown ==
    /// Stops accepting commands and waits up to `deadline` for the queued
    /// ones to finish.
    ///
    /// Past the deadline the worker is aborted; commands still queued are
    /// dropped and never logged. Calling this again after it returned is a
    /// no-op.
    pub async fn shutdown(&self, deadline: Duration) -> Result<()> {
        let mut lifecycle = self.lifecycle.lock().await;
        if let Some(signal) = lifecycle.signal.take() {
            let _ = signal.send(());
        }
        let Some(mut worker) = lifecycle.worker.take() else {
            return Ok(());
        };

        match tokio::time::timeout(deadline, &mut worker).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(CacheError::Internal(format!(
                "command sequencer failed: {}",
                err
            ))),
            Err(_) => {
                worker.abort();
                warn!(
                    "Command sequencer did not drain within {:?}, aborted",
                    deadline
                );
                Err(CacheError::ShutdownTimeout(deadline))
            }
        }
    }
}
