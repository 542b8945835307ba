//! Index Store
//!
//! File operations over the flat slot array: random-access slot reads and
//! writes, tail discovery, and durability.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::Path;

use tracing::trace;

use crate::block::BlockId;
use crate::error::{BlockDbError, Result};

use super::IndexSlot;

/// Durable mapping from sequence number to (payload offset, payload length,
/// identifier), addressed by position arithmetic over a single file.
pub struct IndexStore<I: BlockId> {
    file: File,
    _id: PhantomData<I>,
}

impl<I: BlockId> IndexStore<I> {
    /// Open or create the index file in read/write mode. Existing contents
    /// are never truncated.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::options()
            .create(true)
            .read(true)
            .write(true)
            .open(path)?;

        Ok(Self {
            file,
            _id: PhantomData,
        })
    }

    /// Number of complete slots the file currently holds.
    ///
    /// Derived from the file length on every call rather than tracked as a
    /// cursor; a trailing partial slot (torn write) is excluded.
    pub fn slot_count(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len() / IndexSlot::<I>::SIZE as u64)
    }

    /// Read the slot at position `n`.
    ///
    /// Fails with `OutOfRange` if fewer than `n + 1` complete slots exist.
    pub fn read_slot(&mut self, n: u64) -> Result<IndexSlot<I>> {
        let extent = self.slot_count()?;
        if n >= extent {
            return Err(BlockDbError::OutOfRange { slot: n, extent });
        }

        self.file
            .seek(SeekFrom::Start(n * IndexSlot::<I>::SIZE as u64))?;

        let mut buf = vec![0u8; IndexSlot::<I>::SIZE];
        let got = read_full(&mut self.file, &mut buf)?;
        if got < buf.len() {
            return Err(BlockDbError::ShortRead {
                expected: buf.len(),
                actual: got,
            });
        }

        trace!(slot = n, "read index slot");
        IndexSlot::decode(&buf)
    }

    /// Write the slot at position `n`, extending the file if `n` lies beyond
    /// the current extent. Seeking past the end before writing leaves a
    /// zero-filled gap, which reads back as empty slots.
    pub fn write_slot(&mut self, n: u64, slot: &IndexSlot<I>) -> Result<()> {
        self.file
            .seek(SeekFrom::Start(n * IndexSlot::<I>::SIZE as u64))?;
        self.file.write_all(&slot.encode())?;

        trace!(
            slot = n,
            offset = slot.payload_offset,
            length = slot.payload_length,
            "wrote index slot"
        );
        Ok(())
    }

    /// Scan backward from the final complete slot, skipping tombstones, and
    /// return the first slot with a nonzero length. Returns `None` if the
    /// file is empty or every slot is empty.
    pub fn last_nonempty_slot(&mut self) -> Result<Option<IndexSlot<I>>> {
        let mut pos = self.slot_count()?;

        while pos > 0 {
            pos -= 1;
            let slot = self.read_slot(pos)?;
            if !slot.is_empty() {
                return Ok(Some(slot));
            }
        }

        Ok(None)
    }

    /// Force buffered writes to durable storage.
    pub fn flush(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }
}

/// Read until the buffer is full or the file ends, returning the byte count.
fn read_full(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        let n = file.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}
