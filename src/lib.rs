//! # blockdb
//!
//! A minimal persistent store for immutable, sequentially-numbered blocks:
//! - Durable append with content-derived identifiers
//! - Point lookup by identifier or by sequence number
//! - Tombstone-style removal with no space reclamation
//! - Backward tail scan for the most recent valid block
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     BlockDatabase                            │
//! │   (slot placement, identifier checks, tail scan)             │
//! └───────────────┬─────────────────────────────┬───────────────┘
//!                 │                             │
//!                 ▼                             ▼
//!        ┌─────────────────┐          ┌─────────────────┐
//!        │   IndexStore    │          │    BlobStore    │
//!        │  (fixed slots,   │ offsets  │  (append-only   │
//!        │  "index" file)  │────────▶│  "blocks" file) │
//!        └─────────────────┘          └─────────────────┘
//! ```
//!
//! `store` appends the payload to the blob store, then records its location
//! in the index slot derived from the identifier's sequence number. Every
//! read re-validates the slot's identifier before trusting its offset.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod block;
pub mod index;
pub mod blob;
pub mod db;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BlockDbError, Result};
pub use config::{Config, SyncStrategy};
pub use block::{Block, BlockId, RawBlock, RawBlockId};
pub use db::BlockDatabase;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of blockdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
