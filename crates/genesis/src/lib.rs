//! Genesis configuration for the seqchain sequencer VM.
//!
//! The genesis blob fixes the initial rule set and allocations. An optional
//! upgrade blob schedules rule overrides that activate at given timestamps;
//! [`Genesis::rules`] resolves the rules in force at any block timestamp.

mod rules;
mod upgrade;

pub use rules::{ChainRules, RuleParams};
pub use upgrade::{RuleOverrides, Upgrade, Upgrades};

use seqchain_types::Allocation;
use seqchain_vm::VmGenesis;
use serde::{Deserialize, Serialize};

/// Genesis errors
#[derive(thiserror::Error, Debug)]
pub enum GenesisError {
    #[error("unable to parse genesis: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("unable to parse upgrades: {0}")]
    UpgradeParse(#[source] serde_json::Error),
    #[error("invalid genesis: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Genesis {
    /// Human-readable address prefix
    pub hrp: String,
    /// Branch factor of the state merkle tree
    pub state_branch_factor: u8,
    #[serde(flatten)]
    pub params: RuleParams,
    pub custom_allocation: Vec<Allocation>,
    #[serde(skip)]
    upgrades: Upgrades,
}

impl Default for Genesis {
    fn default() -> Self {
        Self {
            hrp: "seq".to_string(),
            state_branch_factor: 16,
            params: RuleParams::default(),
            custom_allocation: Vec::new(),
            upgrades: Upgrades::default(),
        }
    }
}

impl Genesis {
    /// Parse genesis and upgrade blobs. Empty blobs select the defaults.
    pub fn new(genesis_bytes: &[u8], upgrade_bytes: &[u8]) -> Result<Self, GenesisError> {
        let mut genesis = if genesis_bytes.is_empty() {
            Genesis::default()
        } else {
            serde_json::from_slice::<Genesis>(genesis_bytes).map_err(GenesisError::Parse)?
        };
        genesis.upgrades = Upgrades::parse(upgrade_bytes)?;
        genesis.validate()?;
        Ok(genesis)
    }

    fn validate(&self) -> Result<(), GenesisError> {
        if self.hrp.trim().is_empty() {
            return Err(GenesisError::Invalid("hrp must not be empty".into()));
        }
        if self.state_branch_factor < 2 {
            return Err(GenesisError::Invalid(
                "state_branch_factor must be at least 2".into(),
            ));
        }
        self.params.validate().map_err(GenesisError::Invalid)?;
        for allocation in &self.custom_allocation {
            if allocation.address_bytes().is_none() {
                return Err(GenesisError::Invalid(format!(
                    "allocation address {} is not 32 bytes of hex",
                    allocation.address
                )));
            }
        }
        self.upgrades.validate(&self.params)
    }

    pub fn upgrades(&self) -> &Upgrades {
        &self.upgrades
    }

    /// Rules in force at `timestamp` (unix ms).
    pub fn rules(&self, timestamp: i64, network_id: u32, chain_id: [u8; 32]) -> ChainRules {
        ChainRules::new(
            network_id,
            chain_id,
            self.upgrades.params_at(&self.params, timestamp),
        )
    }
}

impl VmGenesis for Genesis {
    fn hrp(&self) -> &str {
        &self.hrp
    }

    fn state_branch_factor(&self) -> u8 {
        self.state_branch_factor
    }

    fn allocations(&self) -> &[Allocation] {
        &self.custom_allocation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqchain_vm::Rules;

    #[test]
    fn empty_blobs_use_defaults() {
        let genesis = Genesis::new(&[], &[]).unwrap();
        assert_eq!(genesis, Genesis::default());
        assert!(genesis.upgrades().is_empty());
    }

    #[test]
    fn partial_genesis_keeps_other_defaults() {
        let genesis = Genesis::new(br#"{"hrp":"nkit","min_block_gap_ms":250}"#, &[]).unwrap();
        assert_eq!(genesis.hrp, "nkit");
        assert_eq!(genesis.params.min_block_gap_ms, 250);
        assert_eq!(
            genesis.params.validity_window_ms,
            RuleParams::default().validity_window_ms
        );
    }

    #[test]
    fn rules_without_upgrades_are_time_independent() {
        let genesis = Genesis::new(&[], &[]).unwrap();
        let early = genesis.rules(0, 1, [0u8; 32]);
        let late = genesis.rules(i64::MAX, 1, [0u8; 32]);
        assert_eq!(early.params(), late.params());
        assert_eq!(early.network_id(), 1);
    }

    #[test]
    fn malformed_genesis_is_a_parse_error() {
        let err = Genesis::new(b"{not json", &[]).unwrap_err();
        assert!(matches!(err, GenesisError::Parse(_)));
    }

    #[test]
    fn zero_denominator_is_invalid() {
        let err = Genesis::new(br#"{"unit_price_change_denominator":0}"#, &[]).unwrap_err();
        assert!(matches!(err, GenesisError::Invalid(_)), "{err}");
    }

    #[test]
    fn bad_allocation_address_is_invalid() {
        let err = Genesis::new(
            br#"{"custom_allocation":[{"address":"xyz","balance":10}]}"#,
            &[],
        )
        .unwrap_err();
        assert!(err.to_string().contains("xyz"));
    }

    #[test]
    fn allocations_are_exposed_to_the_host() {
        let address = "11".repeat(32);
        let json = format!(r#"{{"custom_allocation":[{{"address":"{address}","balance":500}}]}}"#);
        let genesis = Genesis::new(json.as_bytes(), &[]).unwrap();
        let allocations = VmGenesis::allocations(&genesis);
        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].balance, 500);
        assert_eq!(allocations[0].address_bytes(), Some([0x11; 32]));
    }
}
