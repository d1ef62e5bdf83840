use crate::{KeyValueStore, Result, WriteBatch};
use sled::Db;
use std::path::Path;

/// Storage-engine tuning shared by every partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Page cache size in bytes
    pub cache_capacity: u64,
    /// Background flush period; `None` disables periodic flushing
    pub flush_every_ms: Option<u64>,
    /// Prefer write throughput over on-disk footprint
    pub high_throughput: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 64 * 1024 * 1024,
            flush_every_ms: Some(500),
            high_throughput: true,
        }
    }
}

impl StoreConfig {
    fn to_sled(self, path: &Path) -> sled::Config {
        let mode = if self.high_throughput {
            sled::Mode::HighThroughput
        } else {
            sled::Mode::LowSpace
        };
        sled::Config::new()
            .path(path)
            .cache_capacity(self.cache_capacity)
            .flush_every_ms(self.flush_every_ms)
            .mode(mode)
    }
}

/// Sled-backed store rooted at a single directory
#[derive(Clone, Debug)]
pub struct SledStore {
    db: Db,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(path: P, config: &StoreConfig) -> Result<Self> {
        let db = config.to_sled(path.as_ref()).open()?;
        Ok(Self { db })
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    pub fn was_recovered(&self) -> bool {
        self.db.was_recovered()
    }
}

impl KeyValueStore for SledStore {
    type Batch = SledBatch;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(key)?.map(|v| v.to_vec()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.db.insert(key, value)?;
        Ok(())
    }

    fn len(&self) -> usize {
        self.db.len()
    }

    fn new_batch(&self) -> SledBatch {
        SledBatch {
            db: self.db.clone(),
            batch: Some(sled::Batch::default()),
            staged: 0,
        }
    }
}

/// Write batch over a [`SledStore`], applied with `apply_batch`.
pub struct SledBatch {
    db: Db,
    batch: Option<sled::Batch>,
    staged: usize,
}

impl WriteBatch for SledBatch {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if let Some(batch) = self.batch.as_mut() {
            batch.insert(key, value);
            self.staged += 1;
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.staged
    }

    fn commit(mut self) -> Result<()> {
        if let Some(batch) = self.batch.take() {
            self.db.apply_batch(batch)?;
        }
        self.staged = 0;
        Ok(())
    }
}

impl Drop for SledBatch {
    fn drop(&mut self) {
        if self.batch.take().is_some() && self.staged > 0 {
            tracing::debug!(staged = self.staged, "discarding uncommitted write batch");
        }
    }
}
