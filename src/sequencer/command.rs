//! Sequencer commands and their reply channels.

use tokio::sync::oneshot;

use crate::cache::CacheStats;
use crate::error::Result;

/// A request queued for the sequencer, carrying the channel its outcome is
/// sent back on.
#[derive(Debug)]
pub(crate) enum Command {
    Put {
        key: String,
        value: i64,
        reply: oneshot::Sender<Result<()>>,
    },
    Get {
        key: String,
        reply: oneshot::Sender<Result<i64>>,
    },
    Del {
        key: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Stats {
        reply: oneshot::Sender<CacheStats>,
    },
}

impl Command {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Command::Put { .. } => "PUT",
            Command::Get { .. } => "GET",
            Command::Del { .. } => "DEL",
            Command::Stats { .. } => "STATS",
        }
    }
}
