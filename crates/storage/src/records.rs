use crate::{KeyValueStore, Result, WriteBatch};
use seqchain_types::TxId;
use serde::{Deserialize, Serialize};

/// Key prefix for indexed transactions in the metadata store.
pub const TX_PREFIX: u8 = 0x00;

/// Indexed outcome of an accepted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Timestamp of the block that included the transaction (unix ms)
    pub timestamp: i64,
    pub success: bool,
    /// Resource units consumed
    pub units: u64,
}

pub fn tx_key(id: &TxId) -> [u8; 33] {
    let mut key = [0u8; 33];
    key[0] = TX_PREFIX;
    key[1..].copy_from_slice(id);
    key
}

/// Stage a transaction record into `batch`.
pub fn store_transaction<B: WriteBatch>(
    batch: &mut B,
    id: &TxId,
    timestamp: i64,
    success: bool,
    units: u64,
) -> Result<()> {
    let record = TransactionRecord {
        timestamp,
        success,
        units,
    };
    let value = serde_json::to_vec(&record)?;
    batch.put(&tx_key(id), &value)
}

pub fn get_transaction<S: KeyValueStore>(store: &S, id: &TxId) -> Result<Option<TransactionRecord>> {
    store
        .get(&tx_key(id))?
        .map(|v| serde_json::from_slice(&v))
        .transpose()
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn key_is_prefixed_id() {
        let key = tx_key(&[0xAB; 32]);
        assert_eq!(key[0], TX_PREFIX);
        assert!(key[1..].iter().all(|b| *b == 0xAB));
    }

    #[test]
    fn stored_record_reads_back() {
        let store = MemoryStore::new();
        let mut batch = store.new_batch();
        store_transaction(&mut batch, &[1u8; 32], -5, false, u64::MAX).unwrap();
        batch.commit().unwrap();

        let record = get_transaction(&store, &[1u8; 32]).unwrap().unwrap();
        assert_eq!(
            record,
            TransactionRecord {
                timestamp: -5,
                success: false,
                units: u64::MAX
            }
        );
        assert!(get_transaction(&store, &[2u8; 32]).unwrap().is_none());
    }

    #[test]
    fn corrupt_value_is_a_serialization_error() {
        let store = MemoryStore::new();
        store.put(&tx_key(&[3u8; 32]), b"not json").unwrap();
        assert!(matches!(
            get_transaction(&store, &[3u8; 32]),
            Err(crate::StorageError::Serialization(_))
        ));
    }
}
