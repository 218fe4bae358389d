//! WAL Writer
//!
//! Handles appending entries to the WAL file.
//!
//! An append either lands as one complete frame or leaves the file as it
//! was. A failed write (or sync) is rolled back by truncating to the length
//! before the frame. If even that fails the writer refuses further appends,
//! so no acknowledged entry can end up behind a torn frame.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::config::WalSyncStrategy;
use crate::error::{BookError, Result};
use super::{Operation, WalEntry};

/// Writes entries to the WAL file
pub struct WalWriter {
    /// Append-mode file handle
    file: File,

    /// File length up to the end of the last complete frame
    len: u64,

    /// LSN handed to the next append
    next_lsn: u64,

    sync_strategy: WalSyncStrategy,

    /// Entries written since the last fsync
    unsynced: usize,

    /// Set when a failed append could not be rolled back
    poisoned: bool,
}

impl WalWriter {
    /// Open or create a WAL file, continuing after `last_lsn`
    ///
    /// Pass the `last_lsn` reported by recovery (0 for a fresh log).
    pub fn open(path: &Path, sync_strategy: WalSyncStrategy, last_lsn: u64) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let len = file.metadata()?.len();

        Ok(Self {
            file,
            len,
            next_lsn: last_lsn + 1,
            sync_strategy,
            unsynced: 0,
            poisoned: false,
        })
    }

    /// Append an operation to the WAL, returning its LSN
    ///
    /// On error nothing is logged and the LSN is not consumed.
    pub fn append(&mut self, operation: Operation) -> Result<u64> {
        if self.poisoned {
            return Err(BookError::WalCorruption(
                "log ends in a partial entry that could not be removed; reopen to recover"
                    .to_string(),
            ));
        }

        let lsn = self.next_lsn;
        let frame = WalEntry::new(lsn, operation).encode()?;

        let start = self.len;
        if let Err(e) = self.write_frame(&frame) {
            self.rollback(start);
            return Err(e);
        }

        self.len = start + frame.len() as u64;
        self.next_lsn += 1;
        Ok(lsn)
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.file.write_all(frame)?;
        self.unsynced += 1;

        let due = match self.sync_strategy {
            WalSyncStrategy::EveryWrite => true,
            WalSyncStrategy::EveryNEntries { count } => self.unsynced >= count.max(1),
        };
        if due {
            self.sync()?;
        }
        Ok(())
    }

    /// Cut the file back to `len`, dropping any partial frame
    fn rollback(&mut self, len: u64) {
        self.unsynced = self.unsynced.saturating_sub(1);

        if let Err(e) = self.file.set_len(len) {
            tracing::error!("Failed to roll back WAL to {} bytes: {}", len, e);
            self.poisoned = true;
        }
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        self.unsynced = 0;
        Ok(())
    }

    /// LSN the next append will receive
    pub fn current_lsn(&self) -> u64 {
        self.next_lsn
    }

    /// True once an append failed and could not be undone
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }
}

impl Drop for WalWriter {
    fn drop(&mut self) {
        if self.unsynced > 0 {
            if let Err(e) = self.sync() {
                tracing::warn!("Failed to sync WAL on close: {}", e);
            }
        }
    }
}
