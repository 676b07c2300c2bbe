//! Log Writer Module
//!
//! Append-only handle on the operation log file.

use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, warn};

use crate::oplog::Record;

// == Operation Log ==
/// Appends records to the log, one line each.
///
/// The file is opened in append mode and only ever grows.
#[derive(Debug)]
pub struct OpLog {
    file: File,
    path: PathBuf,
    /// fsync after every append
    sync: bool,
    appended: u64,
}

impl OpLog {
    // == Open ==
    /// Opens (creating if needed) the log at `path`, along with its parent
    /// directory.
    ///
    /// A log whose last line was cut off mid-write gets a terminating newline
    /// first, so the next record starts on a line of its own.
    pub async fn open(path: impl AsRef<Path>, sync: bool) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        if ends_mid_line(&path).await? {
            warn!(
                "Operation log {} ends with a partial line, terminating it",
                path.display()
            );
            file.write_all(b"\n").await?;
            file.flush().await?;
            if sync {
                file.sync_data().await?;
            }
        }

        Ok(Self {
            file,
            path,
            sync,
            appended: 0,
        })
    }

    // == Append ==
    /// Writes one record and returns once it has reached the file (and the
    /// disk, when syncing is enabled).
    pub async fn append(&mut self, record: &Record) -> io::Result<()> {
        let line = format!("{}\n", record);
        self.file.write_all(line.as_bytes()).await?;
        self.file.flush().await?;
        if self.sync {
            self.file.sync_data().await?;
        }
        self.appended += 1;
        debug!("Logged {}", record);
        Ok(())
    }

    // == Close ==
    /// Flushes and syncs outstanding data, releasing the file handle.
    pub async fn close(mut self) -> io::Result<()> {
        self.file.flush().await?;
        self.file.sync_all().await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended through this handle.
    pub fn appended(&self) -> u64 {
        self.appended
    }
}

/// Whether the file is non-empty and its last byte is not a newline.
async fn ends_mid_line(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path).await?;
    if file.metadata().await?.len() == 0 {
        return Ok(false);
    }

    file.seek(SeekFrom::End(-1)).await?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await?;
    Ok(last[0] != b'\n')
}
