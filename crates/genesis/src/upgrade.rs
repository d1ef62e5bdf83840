use crate::rules::RuleParams;
use crate::GenesisError;
use seqchain_vm::StorageUnits;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Subset of [`RuleParams`] replaced by an upgrade. Unset fields keep the
/// value in force before activation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOverrides {
    pub min_block_gap_ms: Option<i64>,
    pub min_empty_block_gap_ms: Option<i64>,
    pub validity_window_ms: Option<i64>,
    pub max_block_txs: Option<usize>,
    pub max_block_units: Option<u64>,
    pub min_unit_price: Option<u64>,
    pub unit_price_change_denominator: Option<u64>,
    pub window_target_units: Option<u64>,
    pub base_compute_units: Option<u64>,
    pub storage_units: Option<StorageUnits>,
}

impl RuleOverrides {
    fn apply(&self, params: &mut RuleParams) {
        macro_rules! set {
            ($($field:ident),*) => {
                $(if let Some(value) = self.$field {
                    params.$field = value;
                })*
            };
        }
        set!(
            min_block_gap_ms,
            min_empty_block_gap_ms,
            validity_window_ms,
            max_block_txs,
            max_block_units,
            min_unit_price,
            unit_price_change_denominator,
            window_target_units,
            base_compute_units,
            storage_units
        );
    }
}

/// Rule overrides activating at `activation_timestamp` (unix ms, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrade {
    pub activation_timestamp: i64,
    #[serde(flatten)]
    pub overrides: RuleOverrides,
}

/// Ordered upgrade schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrades {
    #[serde(default)]
    upgrades: Vec<Upgrade>,
}

impl Upgrades {
    /// Parse an upgrade blob. An empty blob is an empty schedule.
    pub fn parse(bytes: &[u8]) -> Result<Self, GenesisError> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        let upgrades: Upgrades =
            serde_json::from_slice(bytes).map_err(GenesisError::UpgradeParse)?;
        debug!(count = upgrades.len(), "loaded rule upgrades");
        Ok(upgrades)
    }

    pub fn len(&self) -> usize {
        self.upgrades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upgrades.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Upgrade> {
        self.upgrades.iter()
    }

    /// Activations must be strictly increasing and every intermediate rule
    /// set must itself be valid.
    pub(crate) fn validate(&self, base: &RuleParams) -> Result<(), GenesisError> {
        let mut params = *base;
        let mut previous: Option<i64> = None;
        for upgrade in &self.upgrades {
            if let Some(prev) = previous {
                if upgrade.activation_timestamp <= prev {
                    return Err(GenesisError::Invalid(format!(
                        "upgrade at {} does not follow upgrade at {}",
                        upgrade.activation_timestamp, prev
                    )));
                }
            }
            previous = Some(upgrade.activation_timestamp);
            upgrade.overrides.apply(&mut params);
            params.validate().map_err(|reason| {
                GenesisError::Invalid(format!(
                    "upgrade at {}: {reason}",
                    upgrade.activation_timestamp
                ))
            })?;
        }
        Ok(())
    }

    /// Fold every upgrade active at `timestamp` over `base`.
    pub(crate) fn params_at(&self, base: &RuleParams, timestamp: i64) -> RuleParams {
        let mut params = *base;
        for upgrade in self
            .upgrades
            .iter()
            .take_while(|upgrade| upgrade.activation_timestamp <= timestamp)
        {
            upgrade.overrides.apply(&mut params);
        }
        params
    }
}
