use crate::builder::Builder;
use crate::gossiper::Gossiper;
use crate::host::{ChainContext, Vm};
use crate::rules::Rules;
use crate::state::StateManager;
use seqchain_storage::{HostOwned, SledStore};
use seqchain_types::{ActionRegistry, Allocation, AuthRegistry, StatelessBlock};
use std::collections::HashMap;
use std::sync::Arc;

/// API path → HTTP handler, mounted by the host next to its own endpoints.
pub type Handlers = HashMap<String, axum::Router>;

/// Host-tunable options exposed by the controller's configuration.
pub trait VmConfig: Send + Sync {
    fn log_level(&self) -> &str;
    fn parallelism(&self) -> usize;
    fn mempool_size(&self) -> usize;
    fn mempool_payer_size(&self) -> usize;
    fn mempool_exempt_payers(&self) -> &[String];
    fn streaming_backlog_size(&self) -> usize;
    fn trace_enabled(&self) -> bool;
}

/// Genesis view consumed by the host when it seeds state.
pub trait VmGenesis: Send + Sync {
    fn hrp(&self) -> &str;
    fn state_branch_factor(&self) -> u8;
    fn allocations(&self) -> &[Allocation];
}

/// Everything the host receives from a successful initialization.
///
/// `block_store` and `state_store` belong to the host from here on; the
/// controller keeps only its metadata store.
pub struct Initialized {
    pub config: Arc<dyn VmConfig>,
    pub genesis: Arc<dyn VmGenesis>,
    pub builder: Arc<dyn Builder>,
    pub gossiper: Arc<dyn Gossiper>,
    pub block_store: HostOwned<SledStore>,
    pub state_store: HostOwned<SledStore>,
    pub handlers: Handlers,
    pub action_registry: &'static ActionRegistry,
    pub auth_registry: &'static AuthRegistry,
}

/// Application policy plugged into the host.
pub trait Controller: Sized + Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Called once at startup, before any block notification. An error aborts
    /// chain startup.
    fn initialize(
        vm: Arc<dyn Vm>,
        ctx: ChainContext,
        genesis_bytes: &[u8],
        upgrade_bytes: &[u8],
        config_bytes: &[u8],
    ) -> Result<(Self, Initialized), Self::Error>;

    fn rules(&self, timestamp: i64) -> Arc<dyn Rules>;

    fn state_manager(&self) -> Arc<dyn StateManager>;

    /// A block reached the accepted terminal state.
    fn accepted(&self, block: &StatelessBlock) -> Result<(), Self::Error>;

    /// A block reached the rejected terminal state.
    fn rejected(&self, block: &StatelessBlock) -> Result<(), Self::Error>;

    fn shutdown(&self) -> Result<(), Self::Error>;
}
