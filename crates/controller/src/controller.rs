use crate::config::Config;
use crate::error::{ControllerError, Result};
use crate::indexer::{index_accepted, IndexOutcome};
use crate::metrics::{ActionMetrics, ActionMetricsSnapshot};
use crate::rpc::{self, JSONRPC_ENDPOINT};
use crate::state_manager::SeqStateManager;
use crate::strategy::StrategyPlan;
use seqchain_genesis::Genesis;
use seqchain_storage::{
    get_transaction, SledStore, StoreConfig, StorePartitions, TransactionRecord,
};
use seqchain_types::{action_registry, auth_registry, StatelessBlock, TxId};
use seqchain_vm::{ChainContext, Controller, Handlers, Initialized, Rules, StateManager, Vm};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Log and convert a failed initialization step.
fn step<T, E: Into<ControllerError>>(name: &'static str, result: Result<T, E>) -> Result<T> {
    result.map_err(|err| {
        let err = err.into();
        error!(step = name, "controller initialization failed: {err}");
        err
    })
}

/// Sequencer application controller.
pub struct SeqController {
    config: Arc<Config>,
    genesis: Arc<Genesis>,
    network_id: u32,
    chain_id: [u8; 32],
    plan: StrategyPlan,
    metadata: Arc<SledStore>,
    metrics: ActionMetrics,
    state_manager: Arc<SeqStateManager>,
}

impl SeqController {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn genesis(&self) -> &Genesis {
        &self.genesis
    }

    pub fn plan(&self) -> StrategyPlan {
        self.plan
    }

    pub fn metrics(&self) -> &ActionMetrics {
        &self.metrics
    }

    pub fn metrics_snapshot(&self) -> ActionMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Indexed record of a transaction from an accepted block.
    pub fn transaction(&self, id: &TxId) -> Result<Option<TransactionRecord>> {
        get_transaction(self.metadata.as_ref(), id).map_err(ControllerError::StorageRead)
    }

    /// Same as [`Controller::accepted`], also returning what was indexed.
    pub fn index_block(&self, block: &StatelessBlock) -> Result<IndexOutcome> {
        index_accepted(self.metadata.as_ref(), &self.metrics, block).map_err(|err| {
            let err = ControllerError::from(err);
            error!(
                height = block.height,
                id = %hex::encode(block.id()),
                "failed to index accepted block: {err}"
            );
            err
        })
    }
}

impl Controller for SeqController {
    type Error = ControllerError;

    fn initialize(
        vm: Arc<dyn Vm>,
        ctx: ChainContext,
        genesis_bytes: &[u8],
        upgrade_bytes: &[u8],
        config_bytes: &[u8],
    ) -> Result<(Self, Initialized)> {
        let metrics = step("metrics", ActionMetrics::register(ctx.chain_id))?;

        let config = Arc::new(step("config", Config::new(ctx.node_id.clone(), config_bytes))?);
        info!(
            node_id = %ctx.node_id,
            log_level = %config.log_level,
            test_mode = config.test_mode,
            "loaded controller config"
        );

        let genesis = Arc::new(step("genesis", Genesis::new(genesis_bytes, upgrade_bytes))?);
        info!(
            hrp = %genesis.hrp,
            allocations = genesis.custom_allocation.len(),
            upgrades = genesis.upgrades().len(),
            "loaded genesis"
        );

        let partitions = step(
            "stores",
            StorePartitions::open(&ctx.chain_data_dir, &StoreConfig::default())
                .map_err(ControllerError::StorageInit),
        )?;
        let (block_store, state_store, metadata) = partitions.hand_off();
        let metadata = Arc::new(metadata);

        let router = step(
            "rpc",
            rpc::handler(genesis.clone(), ctx.network_id, ctx.chain_id, metadata.clone())
                .map_err(ControllerError::Rpc),
        )?;
        let mut handlers = Handlers::new();
        handlers.insert(JSONRPC_ENDPOINT.to_string(), router);

        let plan = StrategyPlan::from_config(&config);
        let (builder, gossiper) = plan.instantiate(vm);
        info!(
            builder = ?builder.kind(),
            gossiper = ?gossiper.kind(),
            "selected block production strategy"
        );

        let controller = SeqController {
            config: config.clone(),
            genesis: genesis.clone(),
            network_id: ctx.network_id,
            chain_id: ctx.chain_id,
            plan,
            metadata,
            metrics,
            state_manager: Arc::new(SeqStateManager),
        };
        let initialized = Initialized {
            config,
            genesis,
            builder,
            gossiper,
            block_store,
            state_store,
            handlers,
            action_registry: action_registry(),
            auth_registry: auth_registry(),
        };
        Ok((controller, initialized))
    }

    fn rules(&self, timestamp: i64) -> Arc<dyn Rules> {
        Arc::new(self.genesis.rules(timestamp, self.network_id, self.chain_id))
    }

    fn state_manager(&self) -> Arc<dyn StateManager> {
        self.state_manager.clone()
    }

    fn accepted(&self, block: &StatelessBlock) -> Result<()> {
        self.index_block(block).map(|_| ())
    }

    fn rejected(&self, block: &StatelessBlock) -> Result<()> {
        debug!(height = block.height, "block rejected");
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        debug!("controller shutdown");
        Ok(())
    }
}
