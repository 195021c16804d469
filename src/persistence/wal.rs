//! Write-Ahead Log (WAL) for crash recovery.
//!
//! Each entry is written as: [length: u32][crc32: u32][payload: bincode(WalEntry)]
//! The WAL is append-only and fsynced after each write.

use crate::error::{Result, SnipError};
use crate::persistence::serialization;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const FRAME_HEADER_LEN: u64 = 8;

/// A single WAL entry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum WalEntry {
    Upsert {
        id: String,
        document: String,
        embedding: Vec<f32>,
    },
    Checkpoint,
}

/// Entries recovered from a log, and the length of its intact prefix.
#[derive(Debug)]
pub struct Replay {
    pub entries: Vec<WalEntry>,
    pub valid_len: u64,
}

/// Write-Ahead Log file manager.
pub struct WriteAheadLog {
    path: PathBuf,
    file: File,
}

impl WriteAheadLog {
    /// Open (or create) a WAL file at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    /// Append an entry to the WAL and fsync.
    pub fn append(&mut self, entry: &WalEntry) -> Result<()> {
        let payload = serialization::to_bincode(entry)?;
        let crc = crc32fast::hash(&payload);
        let len = u32::try_from(payload.len())
            .map_err(|_| SnipError::Storage("WAL entry exceeds 4 GiB".to_string()))?;

        let mut frame = Vec::with_capacity(8 + payload.len());
        frame.extend_from_slice(&len.to_le_bytes());
        frame.extend_from_slice(&crc.to_le_bytes());
        frame.extend_from_slice(&payload);

        self.file.write_all(&frame)?;
        self.file.sync_all()?;

        Ok(())
    }

    /// Replay all valid entries from the WAL.
    /// Stops at the first corrupted or incomplete entry; `valid_len` marks where it begins.
    pub fn replay(&self) -> Result<Replay> {
        let file = File::open(&self.path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        let mut entries = Vec::new();
        let mut offset = 0u64;

        while file_len - offset >= FRAME_HEADER_LEN {
            let mut header = [0u8; FRAME_HEADER_LEN as usize];
            reader.read_exact(&mut header)?;
            let len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
            let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

            if u64::from(len) > file_len - offset - FRAME_HEADER_LEN {
                warn!(path = %self.path.display(), offset, "WAL ends in a truncated entry");
                break;
            }

            let mut payload = vec![0u8; len as usize];
            reader.read_exact(&mut payload)?;

            if crc32fast::hash(&payload) != expected_crc {
                warn!(path = %self.path.display(), offset, "WAL entry failed checksum");
                break;
            }

            match serialization::from_bincode::<WalEntry>(&payload) {
                Ok(entry) => entries.push(entry),
                Err(_) => {
                    warn!(path = %self.path.display(), offset, "WAL entry failed to decode");
                    break;
                }
            }
            offset += FRAME_HEADER_LEN + u64::from(len);
        }

        if offset < file_len {
            debug!(path = %self.path.display(), dropped = file_len - offset, "WAL has an unusable tail");
        }

        Ok(Replay {
            entries,
            valid_len: offset,
        })
    }

    /// Cut the log back to `len` bytes, dropping a torn or corrupt tail.
    pub fn truncate_to(&mut self, len: u64) -> Result<()> {
        self.file.set_len(len)?;
        self.file.sync_all()?;
        Ok(())
    }

    /// Truncate the WAL file (after a successful checkpoint).
    pub fn truncate(&mut self) -> Result<()> {
        self.truncate_to(0)
    }
}
