use serde::{Deserialize, Serialize};

/// Per-operation storage costs charged in resource units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageUnits {
    pub key_read: u64,
    pub value_read: u64,
    pub key_allocate: u64,
    pub value_allocate: u64,
    pub key_write: u64,
    pub value_write: u64,
}

impl Default for StorageUnits {
    fn default() -> Self {
        Self {
            key_read: 5,
            value_read: 2,
            key_allocate: 20,
            value_allocate: 5,
            key_write: 10,
            value_write: 3,
        }
    }
}

/// Chain rules in force at a given timestamp.
pub trait Rules: Send + Sync {
    fn network_id(&self) -> u32;
    fn chain_id(&self) -> [u8; 32];

    fn min_block_gap_ms(&self) -> i64;
    fn min_empty_block_gap_ms(&self) -> i64;
    fn validity_window_ms(&self) -> i64;

    fn max_block_txs(&self) -> usize;
    fn max_block_units(&self) -> u64;

    fn min_unit_price(&self) -> u64;
    fn unit_price_change_denominator(&self) -> u64;
    fn window_target_units(&self) -> u64;

    fn base_compute_units(&self) -> u64;
    fn storage_units(&self) -> StorageUnits;
}
