use seqchain_vm::{Rules, StorageUnits};
use serde::{Deserialize, Serialize};

/// Tunable rule parameters. Genesis fixes the initial values; upgrades may
/// override any subset from an activation timestamp onwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleParams {
    pub min_block_gap_ms: i64,
    pub min_empty_block_gap_ms: i64,
    pub validity_window_ms: i64,

    pub max_block_txs: usize,
    pub max_block_units: u64,

    pub min_unit_price: u64,
    pub unit_price_change_denominator: u64,
    pub window_target_units: u64,

    pub base_compute_units: u64,
    pub storage_units: StorageUnits,
}

impl Default for RuleParams {
    fn default() -> Self {
        Self {
            min_block_gap_ms: 100,
            min_empty_block_gap_ms: 2_500,
            validity_window_ms: 60_000,
            max_block_txs: 20_000,
            max_block_units: 1_800_000,
            min_unit_price: 100,
            unit_price_change_denominator: 48,
            window_target_units: 20_000_000,
            base_compute_units: 1,
            storage_units: StorageUnits::default(),
        }
    }
}

impl RuleParams {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.min_block_gap_ms < 0 || self.min_empty_block_gap_ms < 0 {
            return Err("block gaps must not be negative".into());
        }
        if self.validity_window_ms <= 0 {
            return Err("validity_window_ms must be positive".into());
        }
        if self.unit_price_change_denominator == 0 {
            return Err("unit_price_change_denominator must be positive".into());
        }
        if self.max_block_txs == 0 {
            return Err("max_block_txs must be positive".into());
        }
        Ok(())
    }
}

/// Rules resolved for a single timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainRules {
    network_id: u32,
    #[serde(with = "hex_id")]
    chain_id: [u8; 32],
    #[serde(flatten)]
    params: RuleParams,
}

impl ChainRules {
    pub fn new(network_id: u32, chain_id: [u8; 32], params: RuleParams) -> Self {
        Self {
            network_id,
            chain_id,
            params,
        }
    }

    pub fn params(&self) -> &RuleParams {
        &self.params
    }
}

impl Rules for ChainRules {
    fn network_id(&self) -> u32 {
        self.network_id
    }

    fn chain_id(&self) -> [u8; 32] {
        self.chain_id
    }

    fn min_block_gap_ms(&self) -> i64 {
        self.params.min_block_gap_ms
    }

    fn min_empty_block_gap_ms(&self) -> i64 {
        self.params.min_empty_block_gap_ms
    }

    fn validity_window_ms(&self) -> i64 {
        self.params.validity_window_ms
    }

    fn max_block_txs(&self) -> usize {
        self.params.max_block_txs
    }

    fn max_block_units(&self) -> u64 {
        self.params.max_block_units
    }

    fn min_unit_price(&self) -> u64 {
        self.params.min_unit_price
    }

    fn unit_price_change_denominator(&self) -> u64 {
        self.params.unit_price_change_denominator
    }

    fn window_target_units(&self) -> u64 {
        self.params.window_target_units
    }

    fn base_compute_units(&self) -> u64 {
        self.params.base_compute_units
    }

    fn storage_units(&self) -> StorageUnits {
        self.params.storage_units
    }
}

mod hex_id {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(id: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(id))
    }
}
