//! Controller binding the seqchain sequencer application into the VM host.
//!
//! On initialization the controller parses config and genesis, opens the
//! block/state/metadata stores, selects the build and gossip strategies and
//! registers its JSON-RPC handler. On every accepted block it indexes each
//! transaction's outcome into the metadata store and counts successful
//! actions by kind.

pub mod config;
pub mod controller;
pub mod error;
pub mod indexer;
pub mod metrics;
pub mod rpc;
pub mod state_manager;
pub mod strategy;

pub use crate::config::{Config, ConfigError, ENV_PREFIX};
pub use controller::SeqController;
pub use error::{ControllerError, Result};
pub use indexer::{index_accepted, IndexError, IndexOutcome};
pub use crate::metrics::{
    describe_metrics, ActionMetrics, ActionMetricsSnapshot, MetricsError, ACTIONS_TOTAL,
};
pub use rpc::{TxReply, JSONRPC_ENDPOINT};
pub use state_manager::{SeqStateManager, NATIVE_ASSET};
pub use strategy::StrategyPlan;
