use crate::host::{wait_for_shutdown, GossipTarget, Vm};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

/// Largest gossip payload accepted by the network layer.
pub const DEFAULT_GOSSIP_MAX_SIZE: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GossiperKind {
    Manual,
    Proposer,
}

/// Policy deciding when pending transactions are pushed to peers.
#[async_trait]
pub trait Gossiper: Send + Sync {
    fn kind(&self) -> GossiperKind;

    /// Gossip right now. Returns the number of transactions sent.
    fn force(&self) -> anyhow::Result<usize>;

    /// Drive periodic gossip until `shutdown` flips to `true`.
    async fn run(&self, mut shutdown: watch::Receiver<bool>);
}

/// Gossips only when forced.
pub struct ManualGossiper {
    vm: Arc<dyn Vm>,
}

impl ManualGossiper {
    pub fn new(vm: Arc<dyn Vm>) -> Self {
        Self { vm }
    }
}

#[async_trait]
impl Gossiper for ManualGossiper {
    fn kind(&self) -> GossiperKind {
        GossiperKind::Manual
    }

    fn force(&self) -> anyhow::Result<usize> {
        self.vm
            .gossip_pending(GossipTarget::All, DEFAULT_GOSSIP_MAX_SIZE)
    }

    async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        wait_for_shutdown(&mut shutdown).await;
    }
}

/// Tuning for [`ProposerGossiper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProposerConfig {
    pub gossip_interval: Duration,
    /// Upper bound on bytes sent per round
    pub gossip_max_size: usize,
    /// How many windows ahead proposers are targeted
    pub gossip_proposer_diff: u64,
    /// How many proposers per window are targeted
    pub gossip_proposer_depth: u64,
    /// Windows ahead within which this node skips gossip because it will build
    pub build_proposer_diff: u64,
    /// Validity windows to wait for a block to verify before re-gossiping
    pub verify_timeout: u64,
}

impl Default for ProposerConfig {
    fn default() -> Self {
        Self {
            gossip_interval: Duration::from_secs(1),
            gossip_max_size: DEFAULT_GOSSIP_MAX_SIZE,
            gossip_proposer_diff: 3,
            gossip_proposer_depth: 1,
            build_proposer_diff: 1,
            verify_timeout: 5,
        }
    }
}

impl ProposerConfig {
    fn target(&self) -> GossipTarget {
        GossipTarget::Proposers {
            diff: self.gossip_proposer_diff,
            depth: self.gossip_proposer_depth,
        }
    }
}

/// Periodically gossips to the validators expected to propose next.
pub struct ProposerGossiper {
    vm: Arc<dyn Vm>,
    config: ProposerConfig,
}

impl ProposerGossiper {
    pub fn new(vm: Arc<dyn Vm>, config: ProposerConfig) -> Self {
        Self { vm, config }
    }

    pub fn config(&self) -> &ProposerConfig {
        &self.config
    }
}

#[async_trait]
impl Gossiper for ProposerGossiper {
    fn kind(&self) -> GossiperKind {
        GossiperKind::Proposer
    }

    fn force(&self) -> anyhow::Result<usize> {
        self.vm
            .gossip_pending(self.config.target(), self.config.gossip_max_size)
    }

    async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.config.gossip_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = wait_for_shutdown(&mut shutdown) => {
                    debug!("proposer gossiper stopped");
                    return;
                }
                _ = ticker.tick() => {
                    match self.force() {
                        Ok(sent) if sent > 0 => debug!(sent, "gossiped transactions to proposers"),
                        Ok(_) => {}
                        Err(err) => warn!("Proposer gossip failed: {err:#}"),
                    }
                }
            }
        }
    }
}
