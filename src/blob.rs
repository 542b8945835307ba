//! Blob Store
//!
//! Append-only byte storage for serialized block payloads. Offsets into the
//! store are only ever produced by `append` and only ever consumed via index
//! slots; bytes are never overwritten or reclaimed, so the file grows
//! monotonically for the lifetime of the database. Tombstoning a block does
//! not free its bytes here.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::trace;

use crate::error::{BlockDbError, Result};

/// Append-only payload file.
pub struct BlobStore {
    file: File,
}

impl BlobStore {
    /// Open or create the blob file in read/write mode. Existing contents
    /// are never truncated.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::options()
            .create(true)
            .read(true)
            .write(true)
            .open(path)?;

        Ok(Self { file })
    }

    /// Current length of the store in bytes.
    pub fn len(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Append a payload to the end of the store, returning the byte offset
    /// it was written at. Offsets are strictly non-decreasing across calls.
    pub fn append(&mut self, bytes: &[u8]) -> Result<u64> {
        let offset = self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(bytes)?;

        trace!(offset, length = bytes.len(), "appended payload");
        Ok(offset)
    }

    /// Read exactly `length` bytes starting at `offset`.
    ///
    /// Fails with `BlobOutOfRange` if the range extends past the current
    /// extent and `ShortRead` if the file hands back fewer bytes than the
    /// extent promised.
    pub fn read_at(&mut self, offset: u64, length: u32) -> Result<Vec<u8>> {
        let extent = self.len()?;
        if offset + length as u64 > extent {
            return Err(BlockDbError::BlobOutOfRange {
                offset,
                length,
                extent,
            });
        }

        self.file.seek(SeekFrom::Start(offset))?;

        let mut buf = vec![0u8; length as usize];
        let mut total = 0;
        while total < buf.len() {
            let n = self.file.read(&mut buf[total..])?;
            if n == 0 {
                return Err(BlockDbError::ShortRead {
                    expected: buf.len(),
                    actual: total,
                });
            }
            total += n;
        }

        Ok(buf)
    }

    /// Force buffered writes to durable storage.
    pub fn flush(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }
}
