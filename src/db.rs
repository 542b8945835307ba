//! Block Database Facade
//!
//! Orchestrates the index store and the blob store behind the public
//! record-oriented API.
//!
//! ## Responsibilities
//! - Compute slot positions from identifiers / sequence numbers
//! - Serialize and deserialize block payloads via the collaborator codec
//! - Enforce the identifier-match invariant on every read path
//! - Implement the composite "last valid block" tail scan
//!
//! ## Write path
//! `store` appends the payload to the blob store first and writes the index
//! slot strictly after the append completes. A crash between the two leaves
//! an orphaned, unreferenced blob range but never a dangling index reference
//! into uninitialized blob space. No rollback is attempted if the slot write
//! fails after a successful append; the index is authoritative and simply
//! will not reference the orphan.

use std::fs;
use std::marker::PhantomData;
use std::path::Path;

use tracing::{debug, warn};

use crate::blob::BlobStore;
use crate::block::{Block, BlockId};
use crate::config::{Config, SyncStrategy};
use crate::error::{BlockDbError, Result};
use crate::index::{IndexSlot, IndexStore};

/// The two open stores. Present while the database is open, dropped on
/// `close` so every handle is released together.
struct Stores<I: BlockId> {
    index: IndexStore<I>,
    blobs: BlobStore,
}

/// Persistent store for immutable, sequentially-numbered blocks.
///
/// ## Concurrency Model: single writer, single process
///
/// The database assumes exclusive ownership of both files between `open` and
/// `close`; there is no locking and no multi-writer coordination. All
/// operations are synchronous and blocking.
pub struct BlockDatabase<B: Block> {
    /// Database configuration
    config: Config,

    /// Open file stores; `None` once closed
    stores: Option<Stores<B::Id>>,

    _block: PhantomData<B>,
}

impl<B: Block> BlockDatabase<B> {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const INDEX_FILENAME: &'static str = "index";
    const BLOCKS_FILENAME: &'static str = "blocks";

    /// Open or create a database with the given config
    ///
    /// On startup:
    /// 1. Create the database directory if it doesn't exist
    /// 2. Check the directory holds either both files or neither
    /// 3. Open both files read/write, creating them empty when absent
    ///
    /// Existing files are never truncated; a directory where exactly one of
    /// the two files exists is rejected as corrupt.
    pub fn open(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        let index_path = config.data_dir.join(Self::INDEX_FILENAME);
        let blocks_path = config.data_dir.join(Self::BLOCKS_FILENAME);

        if index_path.exists() != blocks_path.exists() {
            return Err(BlockDbError::Corrupt(format!(
                "directory {} holds one of index/blocks but not the other",
                config.data_dir.display()
            )));
        }

        let index = IndexStore::open(&index_path)?;
        let blobs = BlobStore::open(&blocks_path)?;

        debug!(dir = %config.data_dir.display(), "opened block database");

        Ok(Self {
            config,
            stores: Some(Stores { index, blobs }),
            _block: PhantomData,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified database directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Whether both files are currently open
    pub fn is_open(&self) -> bool {
        self.stores.is_some()
    }

    /// Release both files
    ///
    /// Every operation other than `open` fails with `Closed` afterwards; a
    /// closed database is reopened by constructing a new one.
    pub fn close(&mut self) {
        if self.stores.take().is_some() {
            debug!(dir = %self.config.data_dir.display(), "closed block database");
        }
    }

    /// Flush both stores: blob store first, then index store
    ///
    /// This call alone guarantees no cross-file ordering; callers requiring
    /// a durable index entry per block use [`SyncStrategy::EveryStore`].
    pub fn flush(&mut self) -> Result<()> {
        let stores = self.stores_mut()?;
        stores.blobs.flush()?;
        stores.index.flush()?;
        Ok(())
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Store a block under its identifier
    ///
    /// Appends the serialized payload to the blob store, then records
    /// `(offset, length, id)` in the index slot at the identifier's sequence
    /// number. Appended bytes are left orphaned if the slot write fails.
    pub fn store(&mut self, id: B::Id, block: &B) -> Result<()> {
        let n = id.number();
        let payload = block.to_bytes()?;
        let sync = self.config.sync_strategy;

        let stores = self.stores_mut()?;
        let offset = stores.blobs.append(&payload)?;
        let slot = IndexSlot::new(offset, payload.len() as u32, id);
        stores.index.write_slot(n, &slot)?;

        debug!(number = n, offset, length = payload.len(), "stored block");

        if sync == SyncStrategy::EveryStore {
            stores.blobs.flush()?;
            stores.index.flush()?;
        }

        Ok(())
    }

    /// Tombstone the block with the given identifier
    ///
    /// Fails with `OutOfRange` if the identifier's sequence number lies
    /// beyond the index extent. If the slot holds a different identifier the
    /// call is a silent no-op: the position belongs to another block than
    /// the one the caller meant to remove. The blob store is untouched;
    /// tombstoned bytes are never reclaimed.
    pub fn remove(&mut self, id: B::Id) -> Result<()> {
        let n = id.number();
        let stores = self.stores_mut()?;

        let slot = stores.index.read_slot(n)?;
        if slot.id == id {
            stores.index.write_slot(n, &slot.tombstoned())?;
            debug!(number = n, "tombstoned block");
        }

        Ok(())
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Whether the identifier is recorded at its sequence number
    ///
    /// Tests identifier residency, not payload validity: a tombstoned slot
    /// whose identifier still matches reports `true`. Callers needing
    /// payload presence use [`fetch_optional`](Self::fetch_optional).
    pub fn contains(&mut self, id: B::Id) -> Result<bool> {
        let slot = self.stores_mut()?.index.read_slot(id.number())?;
        Ok(slot.id == id)
    }

    /// The identifier recorded at sequence number `n`, verbatim
    ///
    /// No payload validity check; a tombstoned slot still yields its
    /// identifier.
    pub fn fetch_block_id(&mut self, n: u64) -> Result<B::Id> {
        let slot = self.stores_mut()?.index.read_slot(n)?;
        Ok(slot.id)
    }

    /// Fetch the block with the given identifier
    ///
    /// Returns `None` when the slot holds a different identifier or has been
    /// tombstoned. A block that deserializes to an identifier other than the
    /// slot's recorded one fails with `Corrupt`.
    pub fn fetch_optional(&mut self, id: B::Id) -> Result<Option<B>> {
        let stores = self.stores_mut()?;
        let slot = stores.index.read_slot(id.number())?;

        if slot.id != id || slot.is_empty() {
            return Ok(None);
        }

        Ok(Some(Self::read_block(stores, &slot)?))
    }

    /// Fetch the block at sequence number `n`
    ///
    /// Addressed directly by position; there is no expected identifier to
    /// compare against, but the deserialized-identifier self-consistency
    /// check still applies. Returns `None` for an empty or tombstoned slot.
    pub fn fetch_by_number(&mut self, n: u64) -> Result<Option<B>> {
        let stores = self.stores_mut()?;
        let slot = stores.index.read_slot(n)?;

        if slot.is_empty() {
            return Ok(None);
        }

        Ok(Some(Self::read_block(stores, &slot)?))
    }

    /// The most recently stored block that has not been tombstoned
    ///
    /// Scans the index backward from its tail, skipping tombstones; the scan
    /// cost is bounded only by the length of the trailing tombstone run.
    pub fn last(&mut self) -> Result<Option<B>> {
        let stores = self.stores_mut()?;

        match stores.index.last_nonempty_slot()? {
            Some(slot) => Ok(Some(Self::read_block(stores, &slot)?)),
            None => Ok(None),
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the database directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Number of complete slots in the index store
    pub fn slot_count(&self) -> Result<u64> {
        Ok(self.stores_ref()?.index.slot_count()?)
    }

    /// Current size of the blob store in bytes
    pub fn blob_size(&self) -> Result<u64> {
        Ok(self.stores_ref()?.blobs.len()?)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn stores_mut(&mut self) -> Result<&mut Stores<B::Id>> {
        self.stores.as_mut().ok_or(BlockDbError::Closed)
    }

    fn stores_ref(&self) -> Result<&Stores<B::Id>> {
        self.stores.as_ref().ok_or(BlockDbError::Closed)
    }

    /// Read and decode the payload a slot points at, then double-check the
    /// decoded block's own identifier against the slot's recorded one. The
    /// payload itself, not just the index, must agree on who it is.
    fn read_block(stores: &mut Stores<B::Id>, slot: &IndexSlot<B::Id>) -> Result<B> {
        let payload = stores
            .blobs
            .read_at(slot.payload_offset, slot.payload_length)?;
        let block = B::from_bytes(&payload)?;

        if block.id() != slot.id {
            warn!(
                number = slot.id.number(),
                "decoded block identifier disagrees with index slot"
            );
            return Err(BlockDbError::Corrupt(format!(
                "block at slot {} deserialized to a different identifier than the index records",
                slot.id.number()
            )));
        }

        Ok(block)
    }
}
