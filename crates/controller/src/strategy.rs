//! Selection of the block-production and gossip strategy pair.

use crate::config::Config;
use seqchain_vm::{
    Builder, Gossiper, ManualBuilder, ManualGossiper, ProposerConfig, ProposerGossiper,
    TimeBuilder, TimeConfig, Vm,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Strategy pair chosen once at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StrategyPlan {
    /// Build and gossip only when explicitly triggered
    Manual,
    /// Rate-paced building and periodic gossip to upcoming proposers
    Automatic {
        time: TimeConfig,
        proposer: ProposerConfig,
    },
}

/// Present and non-zero values replace the default.
fn pick(configured: Option<u64>, default: u64) -> u64 {
    configured.filter(|value| *value > 0).unwrap_or(default)
}

impl StrategyPlan {
    /// Pure function of the configuration.
    pub fn from_config(config: &Config) -> Self {
        if config.test_mode {
            return StrategyPlan::Manual;
        }

        let time_defaults = TimeConfig::default();
        let time = TimeConfig {
            preferred_blocks_per_second: pick(
                config.preferred_blocks_per_second,
                time_defaults.preferred_blocks_per_second,
            ),
        };

        let defaults = ProposerConfig::default();
        let gossip_interval = config
            .gossip_interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.gossip_interval);
        let gossip_max_size = config
            .gossip_max_size
            .filter(|size| *size > 0)
            .and_then(|size| usize::try_from(size).ok())
            .unwrap_or(defaults.gossip_max_size);
        let proposer = ProposerConfig {
            gossip_interval,
            gossip_max_size,
            gossip_proposer_diff: pick(config.gossip_proposer_diff, defaults.gossip_proposer_diff),
            gossip_proposer_depth: pick(
                config.gossip_proposer_depth,
                defaults.gossip_proposer_depth,
            ),
            build_proposer_diff: pick(config.build_proposer_diff, defaults.build_proposer_diff),
            verify_timeout: pick(config.verify_timeout, defaults.verify_timeout),
        };

        StrategyPlan::Automatic { time, proposer }
    }

    /// Construct exactly one builder and one gossiper bound to `vm`.
    pub fn instantiate(&self, vm: Arc<dyn Vm>) -> (Arc<dyn Builder>, Arc<dyn Gossiper>) {
        match *self {
            StrategyPlan::Manual => (
                Arc::new(ManualBuilder::new(vm.clone())),
                Arc::new(ManualGossiper::new(vm)),
            ),
            StrategyPlan::Automatic { time, proposer } => (
                Arc::new(TimeBuilder::new(vm.clone(), time)),
                Arc::new(ProposerGossiper::new(vm, proposer)),
            ),
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, StrategyPlan::Manual)
    }
}
