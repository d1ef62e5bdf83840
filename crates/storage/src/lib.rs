//! Persistent storage for the seqchain controller.
//!
//! Three sled databases are opened per chain (block, state, metadata). The
//! controller writes only to the metadata store, through scoped write batches
//! that discard staged writes unless explicitly committed.

pub mod memory;
pub mod partition;
pub mod records;
pub mod sled_store;

use std::path::PathBuf;

pub use memory::{MemoryBatch, MemoryStore};
pub use partition::{init_sub_directory, open_partition, HostOwned, Partition, StorePartitions};
pub use records::{get_transaction, store_transaction, tx_key, TransactionRecord, TX_PREFIX};
pub use sled_store::{SledBatch, SledStore, StoreConfig};

/// Storage errors
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("failed to initialize {partition} store at {}: {source}", .path.display())]
    Init {
        partition: Partition,
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Backend error: {0}")]
    Backend(String),
}

pub type Result<T, E = StorageError> = std::result::Result<T, E>;

/// Key-value store capable of atomic multi-key writes.
pub trait KeyValueStore: Send + Sync {
    type Batch: WriteBatch;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Open a new write batch. Nothing staged in it is visible until
    /// [`WriteBatch::commit`] succeeds.
    fn new_batch(&self) -> Self::Batch;
}

/// Scoped set of staged writes.
///
/// Implementations discard staged writes when dropped without a successful
/// commit, so early returns never leak partial state.
pub trait WriteBatch {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Number of staged writes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply every staged write atomically.
    fn commit(self) -> Result<()>;
}
