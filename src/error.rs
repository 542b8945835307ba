//! Error types for blockdb
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using BlockDbError
pub type Result<T> = std::result::Result<T, BlockDbError>;

/// Unified error type for blockdb operations
#[derive(Debug, Error)]
pub enum BlockDbError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Range Errors
    // -------------------------------------------------------------------------
    /// The requested slot position lies beyond everything ever written.
    #[error("slot {slot} out of range: index holds {extent} slots")]
    OutOfRange { slot: u64, extent: u64 },

    /// The blob store does not contain the requested byte range.
    #[error("blob range [{offset}, +{length}) exceeds store length {extent}")]
    BlobOutOfRange { offset: u64, length: u32, extent: u64 },

    // -------------------------------------------------------------------------
    // Corruption Errors
    // -------------------------------------------------------------------------
    /// Fewer bytes came back than a slot or payload demands - file truncation.
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    /// On-disk state disagrees with itself (decoded identifier mismatch,
    /// inconsistent database directory, ...).
    #[error("corrupt state: {0}")]
    Corrupt(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    /// Operation attempted on a database that has been closed.
    #[error("database is closed")]
    Closed,
}
