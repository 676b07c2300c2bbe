//! Sequencer Worker
//!
//! The single task that owns the store and the operation log and executes
//! queued commands one at a time, in queue order.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};
use crate::oplog::{OpLog, Record};
use crate::sequencer::Command;

// == Sequencer ==
/// Exclusive owner of the engine state.
///
/// Mutations are written to the log before they are applied in memory, so a
/// failed append leaves the store untouched.
#[derive(Debug)]
pub(crate) struct Sequencer {
    store: CacheStore,
    log: OpLog,
}

impl Sequencer {
    pub(crate) fn new(store: CacheStore, log: OpLog) -> Self {
        Self { store, log }
    }

    // == Execute ==
    /// Runs one command and sends its outcome back.
    pub(crate) async fn execute(&mut self, command: Command) {
        debug!("Executing {}", command.name());
        match command {
            Command::Put { key, value, reply } => {
                let result = self.put(key, value).await;
                let _ = reply.send(result);
            }
            Command::Get { key, reply } => {
                // Nobody is waiting for this read any more
                if reply.is_closed() {
                    debug!("Skipping abandoned GET for {}", key);
                    return;
                }
                let _ = reply.send(self.store.get(&key));
            }
            Command::Del { key, reply } => {
                let result = self.del(&key).await;
                let _ = reply.send(result);
            }
            Command::Stats { reply } => {
                let _ = reply.send(self.store.stats());
            }
        }
    }

    async fn put(&mut self, key: String, value: i64) -> Result<()> {
        if let Err(err) = self.store.check_put(&key) {
            if matches!(err, CacheError::RingFull(_)) {
                self.store.record_ring_full();
            }
            return Err(err);
        }

        self.append(Record::Put {
            key: key.clone(),
            value,
        })
        .await?;

        if let Some(evicted) = self.store.put(key, value)? {
            debug!("Evicted {} to stay within capacity", evicted.key);
        }
        Ok(())
    }

    /// Deleting an absent key succeeds without writing a record.
    async fn del(&mut self, key: &str) -> Result<()> {
        if !self.store.contains(key) {
            return Ok(());
        }

        self.append(Record::Del {
            key: key.to_string(),
        })
        .await?;

        self.store.remove(key);
        Ok(())
    }

    async fn append(&mut self, record: Record) -> Result<()> {
        if let Err(err) = self.log.append(&record).await {
            self.store.record_log_failure();
            warn!(
                "Rejected {}: append to {} failed: {}",
                record,
                self.log.path().display(),
                err
            );
            return Err(CacheError::LogWrite(err));
        }
        Ok(())
    }

    // == Run Loop ==
    /// Executes commands until shutdown is signalled or every handle is gone,
    /// then drains what is already queued and closes the log.
    pub(crate) async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        info!(
            "Command sequencer started with {} resident entries",
            self.store.len()
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                command = commands.recv() => match command {
                    Some(command) => self.execute(command).await,
                    None => break,
                },
            }
        }

        // Reject new submissions, finish the ones already accepted
        commands.close();
        let mut drained = 0usize;
        while let Some(command) = commands.recv().await {
            self.execute(command).await;
            drained += 1;
        }

        let appended = self.log.appended();
        if let Err(err) = self.log.close().await {
            warn!("Failed to sync operation log on shutdown: {}", err);
        }
        info!(
            "Command sequencer stopped: drained {} queued commands, {} records appended this run",
            drained, appended
        );
    }
}

/// Spawns the sequencer on the tokio runtime.
///
/// # Returns
/// A JoinHandle for the worker, used to await the drain at shutdown or to
/// abort it once the deadline has passed.
pub(crate) fn spawn_sequencer(
    sequencer: Sequencer,
    commands: mpsc::Receiver<Command>,
    shutdown: oneshot::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(sequencer.run(commands, shutdown))
}
