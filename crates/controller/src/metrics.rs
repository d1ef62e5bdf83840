use metrics::{counter, describe_counter};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use seqchain_types::ActionKind;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// Prometheus name of the per-action acceptance counter.
pub const ACTIONS_TOTAL: &str = "seqchain_actions_total";

static DESCRIBE: Lazy<()> = Lazy::new(|| {
    describe_counter!(
        ACTIONS_TOTAL,
        "Successful transactions in accepted blocks, by chain and action kind"
    );
});

/// Chains whose counters are currently registered in this process.
static REGISTERED: Lazy<Mutex<HashSet<[u8; 32]>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Metrics errors
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MetricsError {
    #[error("action counters for chain {0} are already registered")]
    Duplicate(String),
}

/// Register metric descriptions with the installed recorder. Only the first
/// call has an effect.
pub fn describe_metrics() {
    Lazy::force(&DESCRIBE);
}

/// Successful-action counters of one controller instance.
///
/// Counters only grow. Each increment is mirrored to the process-wide
/// `metrics` recorder, if one is installed, labelled with the chain.
#[derive(Debug, Default)]
pub struct ActionMetrics {
    counters: [AtomicU64; ActionKind::COUNT],
    chain_label: String,
    registration: Option<[u8; 32]>,
}

impl ActionMetrics {
    /// Unregistered counters, not tied to any chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for `chain_id`. Only one live instance per chain is allowed
    /// in a process; the slot is released on drop.
    pub fn register(chain_id: [u8; 32]) -> Result<Self, MetricsError> {
        let chain_label = hex::encode(&chain_id[..8]);
        if !REGISTERED.lock().insert(chain_id) {
            return Err(MetricsError::Duplicate(chain_label));
        }
        describe_metrics();
        Ok(Self {
            counters: Default::default(),
            chain_label,
            registration: Some(chain_id),
        })
    }

    pub fn record(&self, kind: ActionKind) {
        self.counters[kind.index()].fetch_add(1, Ordering::Relaxed);
        counter!(
            ACTIONS_TOTAL,
            "chain" => self.chain_label.clone(),
            "action" => kind.as_str()
        )
        .increment(1);
    }

    pub fn get(&self, kind: ActionKind) -> u64 {
        self.counters[kind.index()].load(Ordering::Relaxed)
    }

    /// Sum over every action kind.
    pub fn total(&self) -> u64 {
        ActionKind::ALL.iter().map(|kind| self.get(*kind)).sum()
    }

    pub fn snapshot(&self) -> ActionMetricsSnapshot {
        ActionMetricsSnapshot {
            counts: ActionKind::ALL
                .iter()
                .map(|kind| (kind.as_str(), self.get(*kind)))
                .collect(),
        }
    }
}

impl Drop for ActionMetrics {
    fn drop(&mut self) {
        if let Some(chain_id) = self.registration.take() {
            REGISTERED.lock().remove(&chain_id);
        }
    }
}

/// Point-in-time view of [`ActionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionMetricsSnapshot {
    pub counts: BTreeMap<&'static str, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_metrics_is_repeatable() {
        describe_metrics();
        describe_metrics();
        assert!(Lazy::get(&DESCRIBE).is_some());
    }

    #[test]
    fn record_increments_only_its_kind() {
        let metrics = ActionMetrics::new();
        metrics.record(ActionKind::Transfer);
        metrics.record(ActionKind::Transfer);
        metrics.record(ActionKind::BurnAsset);

        assert_eq!(metrics.get(ActionKind::Transfer), 2);
        assert_eq!(metrics.get(ActionKind::BurnAsset), 1);
        assert_eq!(metrics.get(ActionKind::MintAsset), 0);
        assert_eq!(metrics.total(), 3);
    }

    #[test]
    fn snapshot_lists_every_kind() {
        let metrics = ActionMetrics::new();
        metrics.record(ActionKind::ExportAsset);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.counts.len(), ActionKind::COUNT);
        assert_eq!(snapshot.counts["export_asset"], 1);
        assert_eq!(snapshot.counts["create_asset"], 0);
    }

    #[test]
    fn duplicate_registration_fails_until_released() {
        let chain_id = [0xC4; 32];
        let first = ActionMetrics::register(chain_id).unwrap();
        assert_eq!(
            ActionMetrics::register(chain_id).unwrap_err(),
            MetricsError::Duplicate("c4c4c4c4c4c4c4c4".to_string())
        );
        drop(first);
        assert!(ActionMetrics::register(chain_id).is_ok());
    }
}
