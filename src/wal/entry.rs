//! WAL Entry definitions
//!
//! Defines the structure of individual WAL log entries and their framing.

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::{BookError, Result};

/// Frame header: LSN (8) + CRC (4) + Len (4)
pub const HEADER_SIZE: usize = 16;

/// Largest payload accepted when reading (16 MB)
pub const MAX_ENTRY_SIZE: u32 = 16 * 1024 * 1024;

/// A single entry in the WAL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalEntry {
    /// Log Sequence Number - monotonically increasing
    pub lsn: u64,

    /// The operation to perform
    pub operation: Operation,

    /// Timestamp (unix millis) when entry was created
    pub timestamp: u64,
}

/// Operations that can be logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Insert a record under its assigned id; `record` is the JSON document
    Insert { id: String, record: Vec<u8> },
}

impl WalEntry {
    pub fn new(lsn: u64, operation: Operation) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        Self {
            lsn,
            operation,
            timestamp,
        }
    }

    /// Encode header + payload into one frame
    pub fn encode(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(self)?;
        if payload.len() > MAX_ENTRY_SIZE as usize {
            return Err(BookError::WalCorruption(format!(
                "entry {} is {} bytes, limit is {}",
                self.lsn,
                payload.len(),
                MAX_ENTRY_SIZE
            )));
        }

        let mut frame = BytesMut::with_capacity(HEADER_SIZE + payload.len());
        frame.put_u64(self.lsn);
        frame.put_u32(crc32fast::hash(&payload));
        frame.put_u32(payload.len() as u32);
        frame.put_slice(&payload);

        Ok(frame.to_vec())
    }

    /// Decode and verify a payload against its header fields
    pub fn decode(header_lsn: u64, crc: u32, payload: &[u8]) -> Result<Self> {
        let actual = crc32fast::hash(payload);
        if actual != crc {
            return Err(BookError::WalCorruption(format!(
                "checksum mismatch at lsn {}: expected {:08x}, got {:08x}",
                header_lsn, crc, actual
            )));
        }

        let entry: WalEntry = bincode::deserialize(payload)?;
        if entry.lsn != header_lsn {
            return Err(BookError::WalCorruption(format!(
                "header lsn {} does not match entry lsn {}",
                header_lsn, entry.lsn
            )));
        }

        Ok(entry)
    }
}
