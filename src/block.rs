//! Block and identifier collaborator traits
//!
//! The database never interprets payload bytes or derives sequence numbers on
//! its own; both capabilities are supplied by the stored type through these
//! traits. [`RawBlock`] is a ready-made implementation used by the CLI, the
//! benches, and the tests.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BlockDbError, Result};

// =============================================================================
// Collaborator Traits
// =============================================================================

/// Fixed-width identifier naming a block.
///
/// The identifier encodes the block's sequence number in its own bytes
/// (typically a height in the leading bytes); `number()` extracts it. The
/// encoding must be exactly `WIDTH` bytes for every value, since identifiers
/// are packed into fixed-size index slots.
pub trait BlockId: Copy + Eq + fmt::Debug {
    /// Encoded width in bytes. Determines the index slot size.
    const WIDTH: usize;

    /// The sequence number embedded in this identifier.
    fn number(&self) -> u64;

    /// Write the identifier's encoding into `buf` (`buf.len() == WIDTH`).
    fn write_to(&self, buf: &mut [u8]);

    /// Reconstruct an identifier from `buf` (`buf.len() == WIDTH`).
    fn read_from(buf: &[u8]) -> Self;
}

/// A stored record: an opaque payload plus the identifier derived from it.
///
/// `to_bytes`/`from_bytes` are the payload codec; the database treats the
/// result as an opaque byte range.
pub trait Block: Sized {
    type Id: BlockId;

    /// The identifier this block derives from its own content.
    fn id(&self) -> Self::Id;

    /// Serialize the block to its payload bytes.
    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// Deserialize a block from payload bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self>;
}

// =============================================================================
// RawBlock - shipped collaborator implementation
// =============================================================================

/// Width of a [`RawBlockId`] in bytes.
pub const RAW_ID_WIDTH: usize = 20;

/// 20-byte identifier: big-endian height in bytes 0..4, crc32 of the payload
/// in bytes 4..8, remaining bytes zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlockId(pub [u8; RAW_ID_WIDTH]);

impl RawBlockId {
    /// Build the identifier for a given height and payload.
    pub fn new(height: u32, payload: &[u8]) -> Self {
        let mut bytes = [0u8; RAW_ID_WIDTH];
        bytes[0..4].copy_from_slice(&height.to_be_bytes());
        bytes[4..8].copy_from_slice(&crc32fast::hash(payload).to_le_bytes());
        Self(bytes)
    }

    /// The height encoded in the leading bytes.
    pub fn height(&self) -> u32 {
        u32::from_be_bytes(self.0[0..4].try_into().unwrap())
    }
}

impl BlockId for RawBlockId {
    const WIDTH: usize = RAW_ID_WIDTH;

    fn number(&self) -> u64 {
        self.height() as u64
    }

    fn write_to(&self, buf: &mut [u8]) {
        buf.copy_from_slice(&self.0);
    }

    fn read_from(buf: &[u8]) -> Self {
        let mut bytes = [0u8; RAW_ID_WIDTH];
        bytes.copy_from_slice(buf);
        Self(bytes)
    }
}

impl fmt::Display for RawBlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// A block with an opaque payload, numbered by height.
///
/// Heights start at 1; slot 0 of the index stays empty in normal use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBlock {
    /// Position of this block in the sequence
    pub height: u32,

    /// Opaque payload bytes
    pub payload: Vec<u8>,
}

impl RawBlock {
    pub fn new(height: u32, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            height,
            payload: payload.into(),
        }
    }
}

impl Block for RawBlock {
    type Id = RawBlockId;

    fn id(&self) -> RawBlockId {
        RawBlockId::new(self.height, &self.payload)
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| BlockDbError::Serialization(e.to_string()))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| BlockDbError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_embeds_height() {
        let block = RawBlock::new(42, b"payload".to_vec());
        assert_eq!(block.id().number(), 42);
        assert_eq!(block.id().height(), 42);
    }

    #[test]
    fn test_id_depends_on_payload() {
        let a = RawBlock::new(7, b"aaa".to_vec());
        let b = RawBlock::new(7, b"bbb".to_vec());
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id().number(), b.id().number());
    }

    #[test]
    fn test_id_round_trips_through_bytes() {
        let id = RawBlockId::new(123, b"data");
        let mut buf = [0u8; RAW_ID_WIDTH];
        id.write_to(&mut buf);
        assert_eq!(RawBlockId::read_from(&buf), id);
    }

    #[test]
    fn test_payload_codec_round_trip() {
        let block = RawBlock::new(5, vec![1, 2, 3, 4]);
        let bytes = block.to_bytes().unwrap();
        let decoded = RawBlock::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, block);
    }
}
