//! Log Replay Module
//!
//! Rebuilds a store from the operation log at startup.

use std::io::{self, ErrorKind};
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::cache::{CacheStore, MAX_KEY_LENGTH};
use crate::error::CacheError;
use crate::oplog::Record;

/// Longest line a valid record can produce: `PUT,`, the key, `,` and an
/// `i64`, with room for a trailing `\r`.
const MAX_LINE_LENGTH: usize = MAX_KEY_LENGTH + 32;

// == Replay Report ==
/// Summary of a replay pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Records applied to the store
    pub applied: usize,
    /// Lines that could not be parsed or applied
    pub skipped: usize,
}

// == Replay ==
/// Replays every record in `path` into `store`, in file order.
///
/// Records go through the same `put`/`remove` calls runtime commands use, so
/// capacity eviction happens during replay too. A missing or unreadable log
/// leaves the store empty; malformed lines are skipped. Reading stops at the
/// first I/O error, keeping everything replayed before it.
pub async fn replay(path: impl AsRef<Path>, store: &mut CacheStore) -> ReplayReport {
    let path = path.as_ref();
    let mut report = ReplayReport::default();

    let file = match File::open(path).await {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!("No operation log at {}, starting empty", path.display());
            return report;
        }
        Err(err) => {
            warn!(
                "Operation log {} unreadable, starting empty: {}",
                path.display(),
                err
            );
            return report;
        }
    };

    let mut reader = BufReader::new(file);
    let mut raw = Vec::with_capacity(MAX_LINE_LENGTH);
    let mut line_no = 0usize;
    loop {
        let oversized = match next_line(&mut reader, &mut raw).await {
            Ok(Some(oversized)) => oversized,
            Ok(None) => break,
            Err(err) => {
                warn!(
                    "Stopped reading operation log at line {}: {}",
                    line_no + 1,
                    err
                );
                break;
            }
        };
        line_no += 1;

        if oversized {
            warn!(
                "Skipping log line {}: longer than {} bytes",
                line_no, MAX_LINE_LENGTH
            );
            report.skipped += 1;
            continue;
        }

        let line = String::from_utf8_lossy(&raw);
        if line.trim().is_empty() {
            continue;
        }

        let record = match line.parse::<Record>() {
            Ok(record) => record,
            Err(err) => {
                warn!("Skipping log line {}: {}", line_no, err);
                report.skipped += 1;
                continue;
            }
        };

        match apply(store, record) {
            Ok(()) => report.applied += 1,
            Err(err) => {
                warn!("Skipping log line {}: {}", line_no, err);
                report.skipped += 1;
            }
        }
    }

    info!(
        "Recovered {} entries from {} ({} records applied, {} skipped)",
        store.len(),
        path.display(),
        report.applied,
        report.skipped
    );
    report
}

/// Reads the next line into `buf` without its newline, keeping at most
/// `MAX_LINE_LENGTH` bytes and discarding the rest of a longer line.
///
/// Returns `None` at end of file, otherwise whether the line was too long.
async fn next_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<bool>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let mut read_any = false;
    let mut oversized = false;
    loop {
        let chunk = reader.fill_buf().await?;
        if chunk.is_empty() {
            return Ok(read_any.then_some(oversized));
        }
        read_any = true;

        let newline = chunk.iter().position(|&b| b == b'\n');
        let segment = &chunk[..newline.unwrap_or(chunk.len())];
        let room = MAX_LINE_LENGTH.saturating_sub(buf.len());
        if segment.len() > room {
            oversized = true;
        }
        buf.extend_from_slice(&segment[..segment.len().min(room)]);

        let used = newline.map_or(chunk.len(), |i| i + 1);
        reader.consume(used);
        if newline.is_some() {
            return Ok(Some(oversized));
        }
    }
}

fn apply(store: &mut CacheStore, record: Record) -> Result<(), CacheError> {
    match record {
        Record::Put { key, value } => store.put(key, value).map(|_| ()),
        Record::Del { key } => {
            store.remove(&key);
            Ok(())
        }
    }
}
