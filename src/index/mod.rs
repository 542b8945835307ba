//! Index Store Module
//!
//! A file treated as a flat array of fixed-size slots, one per sequence
//! number. Position `n` lives at byte offset `n * slot_size`, so lookups are
//! O(1) arithmetic with no secondary index structure. Gaps left by skipped
//! sequence numbers are zero-filled and read back as empty slots.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │ Slot 0                                              │
//! │ ┌──────────────┬──────────────┬───────────────────┐ │
//! │ │ Offset (8)   │ Length (4)   │ Identifier (W)    │ │
//! │ └──────────────┴──────────────┴───────────────────┘ │
//! ├─────────────────────────────────────────────────────┤
//! │ Slot 1                                              │
//! │ ┌──────────────┬──────────────┬───────────────────┐ │
//! │ │ Offset (8)   │ Length (4)   │ Identifier (W)    │ │
//! │ └──────────────┴──────────────┴───────────────────┘ │
//! └─────────────────────────────────────────────────────┘
//! ```
//! Offset and length are little-endian; `Length == 0` marks a tombstoned or
//! never-written slot. W is the identifier type's fixed width.

mod slot;
mod store;

pub use slot::{IndexSlot, SLOT_PREFIX_SIZE};
pub use store::IndexStore;
