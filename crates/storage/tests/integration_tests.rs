//! Integration tests for storage backends (sled and in-memory).
//! Covers scoped batches, transaction records and partition layout.

use seqchain_storage::{
    get_transaction, open_partition, store_transaction, KeyValueStore, MemoryStore, Partition,
    SledStore, StoreConfig, StorePartitions, TransactionRecord, WriteBatch,
};
use tempfile::TempDir;

/// Helper to derive a distinct transaction id
fn tx_id(seed: u8) -> [u8; 32] {
    let mut id = [0u8; 32];
    id[0] = seed;
    id[31] = seed.wrapping_mul(7);
    id
}

// ============================================================================
// Generic test suite that works with any KeyValueStore implementation
// ============================================================================

fn test_batched_records<S: KeyValueStore>(store: &S) {
    let mut batch = store.new_batch();
    for seed in 0..10u8 {
        store_transaction(&mut batch, &tx_id(seed), 1_000, seed % 2 == 0, seed as u64).unwrap();
    }
    assert_eq!(batch.len(), 10);

    // Nothing visible before commit
    assert!(get_transaction(store, &tx_id(0)).unwrap().is_none());

    batch.commit().unwrap();

    for seed in 0..10u8 {
        let record = get_transaction(store, &tx_id(seed)).unwrap().unwrap();
        assert_eq!(
            record,
            TransactionRecord {
                timestamp: 1_000,
                success: seed % 2 == 0,
                units: seed as u64,
            }
        );
    }
    assert_eq!(store.len(), 10);
}

fn test_abandoned_batch<S: KeyValueStore>(store: &S) {
    let before = store.len();
    {
        let mut batch = store.new_batch();
        store_transaction(&mut batch, &tx_id(200), 5, true, 1).unwrap();
        store_transaction(&mut batch, &tx_id(201), 5, true, 1).unwrap();
        // dropped without commit
    }
    assert_eq!(store.len(), before);
    assert!(get_transaction(store, &tx_id(200)).unwrap().is_none());
}

fn test_empty_batch_commits<S: KeyValueStore>(store: &S) {
    let before = store.len();
    let batch = store.new_batch();
    assert!(batch.is_empty());
    batch.commit().unwrap();
    assert_eq!(store.len(), before);
}

#[test]
fn sled_store_suite() {
    let dir = TempDir::new().expect("temp dir");
    let store = SledStore::open(dir.path(), &StoreConfig::default()).expect("sled store");
    test_batched_records(&store);
    test_abandoned_batch(&store);
    test_empty_batch_commits(&store);
}

#[test]
fn memory_store_suite() {
    let store = MemoryStore::new();
    test_batched_records(&store);
    test_abandoned_batch(&store);
    test_empty_batch_commits(&store);
}

#[test]
fn records_survive_restart() {
    let dir = TempDir::new().expect("temp dir");
    {
        let stores = StorePartitions::open(dir.path(), &StoreConfig::default()).unwrap();
        let mut batch = stores.metadata.new_batch();
        store_transaction(&mut batch, &tx_id(1), 42, true, 5).unwrap();
        batch.commit().unwrap();
        stores.metadata.flush().unwrap();
    }

    let metadata =
        open_partition(dir.path(), Partition::Metadata, &StoreConfig::default()).unwrap();
    let record = get_transaction(&metadata, &tx_id(1)).unwrap().unwrap();
    assert_eq!(record.timestamp, 42);
    assert!(record.success);
    assert_eq!(record.units, 5);
}

#[test]
fn metadata_records_are_not_visible_in_other_partitions() {
    let dir = TempDir::new().expect("temp dir");
    let stores = StorePartitions::open(dir.path(), &StoreConfig::default()).unwrap();

    let mut batch = stores.metadata.new_batch();
    store_transaction(&mut batch, &tx_id(9), 1, true, 1).unwrap();
    batch.commit().unwrap();

    assert!(get_transaction(&stores.block, &tx_id(9)).unwrap().is_none());
    assert!(get_transaction(&stores.state, &tx_id(9)).unwrap().is_none());
    assert!(stores.block.is_empty());
    assert!(stores.state.is_empty());
}

#[test]
fn hand_off_keeps_metadata_with_caller() {
    let dir = TempDir::new().expect("temp dir");
    let stores = StorePartitions::open(dir.path(), &StoreConfig::default()).unwrap();
    let (block, state, metadata) = stores.hand_off();

    metadata.put(b"m", b"1").unwrap();
    block.put(b"b", b"1").unwrap();
    state.put(b"s", b"1").unwrap();

    assert!(metadata.get(b"b").unwrap().is_none());
    assert!(block.get(b"m").unwrap().is_none());
    assert!(state.get(b"b").unwrap().is_none());
    assert_eq!(block.into_inner().get(b"b").unwrap(), Some(b"1".to_vec()));
}
