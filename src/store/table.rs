//! Book table
//!
//! BTreeMap-based table with RwLock for concurrency and an optional WAL.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::{Config, WalSyncStrategy};
use crate::error::{BookError, Result};
use crate::model::{Book, BookId};
use crate::wal::{Operation, WalRecovery, WalWriter};
use super::BookStore;

/// Local record table
///
/// ## Concurrency Model
/// - Reads take the map's read lock and clone out records
/// - `post` logs the record first, on the blocking pool with only the WAL
///   mutex held, then takes the write lock just for the map insert
/// - Ids are fresh UUIDs, so WAL order never has to match insert order
pub struct Table {
    records: RwLock<BTreeMap<BookId, Book>>,

    /// `None` for a memory-only table
    wal: Option<Arc<Mutex<WalWriter>>>,
}

impl Table {
    const WAL_FILENAME: &'static str = "books.wal";

    /// A table that forgets everything on drop
    pub fn in_memory() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            wal: None,
        }
    }

    /// Open the table described by `config`
    ///
    /// Without a data directory this is [`Table::in_memory`].
    pub fn open(config: &Config) -> Result<Self> {
        match &config.data_dir {
            Some(dir) => Self::open_dir(dir, config.wal_sync_strategy),
            None => Ok(Self::in_memory()),
        }
    }

    /// Open or create a durable table under `dir`
    ///
    /// On startup:
    /// 1. Create the directory if needed
    /// 2. Recover valid entries from the WAL (truncating a torn tail)
    /// 3. Replay them into the map
    /// 4. Reopen the WAL for appends after the last recovered LSN
    pub fn open_dir(dir: &Path, sync_strategy: WalSyncStrategy) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let wal_path = dir.join(Self::WAL_FILENAME);

        let (entries, recovery) = WalRecovery::recover(&wal_path)?;
        if recovery.entries_recovered > 0 || recovery.entries_corrupted > 0 {
            tracing::info!(
                "WAL recovery: {} entries recovered, {} corrupted, last_lsn={}",
                recovery.entries_recovered,
                recovery.entries_corrupted,
                recovery.last_lsn
            );
        }

        let mut records = BTreeMap::new();
        for entry in entries {
            match entry.operation {
                Operation::Insert { id, record } => {
                    let mut book: Book = serde_json::from_slice(&record)?;
                    let id = BookId::from(id);
                    book.id = Some(id.clone());
                    records.insert(id, book);
                }
            }
        }

        let wal = WalWriter::open(&wal_path, sync_strategy, recovery.last_lsn)?;

        Ok(Self {
            records: RwLock::new(records),
            wal: Some(Arc::new(Mutex::new(wal))),
        })
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn is_durable(&self) -> bool {
        self.wal.is_some()
    }

    fn lookup(&self, id: &BookId) -> Option<Book> {
        self.records.read().get(id).cloned()
    }

    fn snapshot(&self) -> Vec<Book> {
        self.records.read().values().cloned().collect()
    }

    /// Write `book` to the WAL off the async runtime
    async fn log(&self, id: &BookId, book: &Book) -> Result<()> {
        let Some(wal) = &self.wal else {
            return Ok(());
        };

        let operation = Operation::Insert {
            id: id.as_str().to_string(),
            record: serde_json::to_vec(book)?,
        };
        let wal = Arc::clone(wal);

        tokio::task::spawn_blocking(move || wal.lock().append(operation))
            .await
            .map_err(|e| BookError::Store(format!("WAL task for record {} failed: {}", id, e)))?
            .map_err(|e| BookError::Store(format!("failed to log record {}: {}", id, e)))?;
        Ok(())
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[async_trait]
impl BookStore for Table {
    async fn get(&self, id: &BookId) -> Result<Option<Book>> {
        Ok(self.lookup(id))
    }

    async fn list(&self) -> Result<Vec<Book>> {
        Ok(self.snapshot())
    }

    async fn post(&self, mut book: Book) -> Result<Book> {
        let id = BookId::new(Uuid::new_v4().to_string());
        book.id = Some(id.clone());

        self.log(&id, &book).await?;

        self.records.write().insert(id, book.clone());
        Ok(book)
    }
}
