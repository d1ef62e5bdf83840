use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::watch;

/// Identity and data location of the chain being initialized.
#[derive(Debug, Clone)]
pub struct ChainContext {
    pub network_id: u32,
    pub chain_id: [u8; 32],
    pub node_id: String,
    /// Chain-scoped data directory; partitions are created beneath it
    pub chain_data_dir: PathBuf,
}

/// Peers a gossip round is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum GossipTarget {
    /// Every connected validator
    All,
    /// Validators expected to propose within the next `diff` windows, `depth`
    /// proposers deep
    Proposers { diff: u64, depth: u64 },
}

/// Handle to the host VM instance.
///
/// Strategies call back into the host through this trait; they never touch
/// consensus or networking directly.
pub trait Vm: Send + Sync {
    fn chain_id(&self) -> [u8; 32];

    /// Ask the consensus engine to build a block.
    fn notify_build_ready(&self);

    /// Propagate pending transactions to `target`, sending at most `max_size`
    /// bytes. Returns the number of transactions sent.
    fn gossip_pending(&self, target: GossipTarget, max_size: usize) -> anyhow::Result<usize>;
}

/// Resolve once `shutdown` holds `true` or its sender is gone.
pub async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
