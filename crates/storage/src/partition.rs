use crate::sled_store::{SledStore, StoreConfig};
use crate::{Result, StorageError};
use std::fmt;
use std::fs;
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// Logical key space of a chain's data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Block,
    State,
    Metadata,
}

impl Partition {
    pub const ALL: [Partition; 3] = [Partition::Block, Partition::State, Partition::Metadata];

    /// Subdirectory name under the chain data directory.
    pub const fn dir_name(self) -> &'static str {
        match self {
            Partition::Block => "block",
            Partition::State => "state",
            Partition::Metadata => "metadata",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Create `base/name` if it does not exist and return its path.
pub fn init_sub_directory(base: &Path, name: &str) -> io::Result<PathBuf> {
    let path = base.join(name);
    fs::create_dir_all(&path)?;
    Ok(path)
}

/// Open one partition of a chain data directory.
pub fn open_partition(base: &Path, partition: Partition, config: &StoreConfig) -> Result<SledStore> {
    let path = init_sub_directory(base, partition.dir_name()).map_err(|err| StorageError::Init {
        partition,
        path: base.join(partition.dir_name()),
        source: Box::new(err),
    })?;
    SledStore::open(&path, config).map_err(|err| StorageError::Init {
        partition,
        path,
        source: Box::new(err),
    })
}

/// Store whose lifecycle belongs to the host once initialization hands it
/// over. The controller must never flush or close a `HostOwned` store on its
/// own shutdown path.
#[derive(Debug, Clone)]
pub struct HostOwned<T>(T);

impl<T> HostOwned<T> {
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for HostOwned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

/// The three independently rooted stores of one chain.
#[derive(Debug, Clone)]
pub struct StorePartitions {
    pub block: SledStore,
    pub state: SledStore,
    pub metadata: SledStore,
}

impl StorePartitions {
    /// Open every partition under `base`, all with the same engine config.
    /// Fails as a whole if any single partition cannot be created or opened.
    pub fn open(base: &Path, config: &StoreConfig) -> Result<Self> {
        let block = open_partition(base, Partition::Block, config)?;
        let state = open_partition(base, Partition::State, config)?;
        let metadata = open_partition(base, Partition::Metadata, config)?;
        tracing::debug!(base = %base.display(), "opened block, state and metadata stores");
        Ok(Self {
            block,
            state,
            metadata,
        })
    }

    /// Split into the host-owned block and state stores and the metadata
    /// store kept by the controller.
    pub fn hand_off(self) -> (HostOwned<SledStore>, HostOwned<SledStore>, SledStore) {
        (
            HostOwned::new(self.block),
            HostOwned::new(self.state),
            self.metadata,
        )
    }
}
