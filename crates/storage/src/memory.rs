use crate::{KeyValueStore, Result, StorageError, WriteBatch};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

type Table = Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>;

/// In-memory testing backend
///
/// Optional fault injection makes batch puts or commits fail, for exercising
/// error paths of code that writes through a [`WriteBatch`].
#[derive(Clone, Default)]
pub struct MemoryStore {
    table: Table,
    fail_put_at: Option<usize>,
    fail_commit: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batches opened on the returned store fail on their `index`-th put
    /// (zero based). The underlying table is shared with `self`.
    pub fn failing_put_at(&self, index: usize) -> Self {
        Self {
            table: self.table.clone(),
            fail_put_at: Some(index),
            fail_commit: self.fail_commit,
        }
    }

    /// Batches opened on the returned store fail to commit.
    pub fn failing_commit(&self) -> Self {
        Self {
            table: self.table.clone(),
            fail_put_at: self.fail_put_at,
            fail_commit: true,
        }
    }

    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.table.read().keys().cloned().collect()
    }
}

impl KeyValueStore for MemoryStore {
    type Batch = MemoryBatch;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.table.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.table.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn len(&self) -> usize {
        self.table.read().len()
    }

    fn new_batch(&self) -> MemoryBatch {
        MemoryBatch {
            table: self.table.clone(),
            staged: Vec::new(),
            fail_put_at: self.fail_put_at,
            fail_commit: self.fail_commit,
        }
    }
}

pub struct MemoryBatch {
    table: Table,
    staged: Vec<(Vec<u8>, Vec<u8>)>,
    fail_put_at: Option<usize>,
    fail_commit: bool,
}

impl WriteBatch for MemoryBatch {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if self.fail_put_at == Some(self.staged.len()) {
            return Err(StorageError::Backend(format!(
                "injected put failure at index {}",
                self.staged.len()
            )));
        }
        self.staged.push((key.to_vec(), value.to_vec()));
        Ok(())
    }

    fn len(&self) -> usize {
        self.staged.len()
    }

    fn commit(mut self) -> Result<()> {
        if self.fail_commit {
            return Err(StorageError::Backend("injected commit failure".to_string()));
        }
        let staged = std::mem::take(&mut self.staged);
        let mut table = self.table.write();
        for (key, value) in staged {
            table.insert(key, value);
        }
        Ok(())
    }
}

impl Drop for MemoryBatch {
    fn drop(&mut self) {
        self.staged.clear();
    }
}
