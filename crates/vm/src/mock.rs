//! In-process host used by tests of strategies and controllers.

use crate::host::{GossipTarget, Vm};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Host that records every callback instead of talking to a network.
#[derive(Default)]
pub struct RecordingVm {
    chain_id: [u8; 32],
    builds: AtomicUsize,
    gossips: Mutex<Vec<(GossipTarget, usize)>>,
    fail_gossip: bool,
}

impl RecordingVm {
    pub fn with_chain_id(chain_id: [u8; 32]) -> Self {
        Self {
            chain_id,
            ..Self::default()
        }
    }

    /// Host whose gossip calls are recorded and then fail.
    pub fn failing_gossip() -> Self {
        Self {
            fail_gossip: true,
            ..Self::default()
        }
    }

    pub fn build_signals(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn gossip_rounds(&self) -> Vec<(GossipTarget, usize)> {
        self.gossips.lock().clone()
    }
}

impl Vm for RecordingVm {
    fn chain_id(&self) -> [u8; 32] {
        self.chain_id
    }

    fn notify_build_ready(&self) {
        self.builds.fetch_add(1, Ordering::SeqCst);
    }

    fn gossip_pending(&self, target: GossipTarget, max_size: usize) -> anyhow::Result<usize> {
        self.gossips.lock().push((target, max_size));
        if self.fail_gossip {
            anyhow::bail!("gossip unavailable");
        }
        Ok(0)
    }
}
