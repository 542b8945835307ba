//! Index slot encode/decode
//!
//! Slots are packed with an explicit fixed layout rather than relying on
//! in-memory struct layout matching the file: 8-byte LE payload offset,
//! 4-byte LE payload length, then the identifier's fixed-width encoding.

use crate::block::BlockId;
use crate::error::{BlockDbError, Result};

/// Bytes preceding the identifier: offset (8) + length (4)
pub const SLOT_PREFIX_SIZE: usize = 12;

/// One fixed-size index record: where a block's payload lives, how long it
/// is, and which identifier nominally occupies the position.
///
/// A slot is meaningful only if `payload_length > 0` AND its identifier
/// decodes to the slot's own position; read paths must re-validate identifier
/// equality before trusting the offset and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSlot<I: BlockId> {
    /// Byte offset into the blob store where the payload begins
    pub payload_offset: u64,

    /// Payload byte count; 0 marks a tombstoned or never-written slot
    pub payload_length: u32,

    /// Identifier of the block nominally occupying this position
    pub id: I,
}

impl<I: BlockId> IndexSlot<I> {
    /// On-disk size of one slot for this identifier type.
    pub const SIZE: usize = SLOT_PREFIX_SIZE + I::WIDTH;

    pub fn new(payload_offset: u64, payload_length: u32, id: I) -> Self {
        Self {
            payload_offset,
            payload_length,
            id,
        }
    }

    /// Whether this slot is tombstoned or was never written.
    pub fn is_empty(&self) -> bool {
        self.payload_length == 0
    }

    /// The same slot with its length forced to zero, offset and identifier
    /// preserved.
    pub fn tombstoned(&self) -> Self {
        Self {
            payload_length: 0,
            ..*self
        }
    }

    /// Pack the slot into its on-disk encoding.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::SIZE];
        buf[0..8].copy_from_slice(&self.payload_offset.to_le_bytes());
        buf[8..12].copy_from_slice(&self.payload_length.to_le_bytes());
        self.id.write_to(&mut buf[SLOT_PREFIX_SIZE..]);
        buf
    }

    /// Unpack a slot from its on-disk encoding.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::SIZE {
            return Err(BlockDbError::ShortRead {
                expected: Self::SIZE,
                actual: buf.len(),
            });
        }

        let payload_offset = u64::from_le_bytes(buf[0..8].try_into().unwrap());
        let payload_length = u32::from_le_bytes(buf[8..12].try_into().unwrap());
        let id = I::read_from(&buf[SLOT_PREFIX_SIZE..Self::SIZE]);

        Ok(Self {
            payload_offset,
            payload_length,
            id,
        })
    }
}
