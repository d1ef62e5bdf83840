use crate::host::{wait_for_shutdown, Vm};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuilderKind {
    Manual,
    Time,
}

/// Policy deciding when the host is asked to build a block.
#[async_trait]
pub trait Builder: Send + Sync {
    fn kind(&self) -> BuilderKind;

    /// Called by the host whenever new transactions enter the mempool.
    fn queue_notify(&self);

    /// Signal the host immediately, ignoring any pacing.
    fn force_notify(&self);

    /// Drive timer-based behaviour until `shutdown` flips to `true`.
    async fn run(&self, mut shutdown: watch::Receiver<bool>);
}

/// Builds only on explicit trigger. Used by deterministic integration tests.
pub struct ManualBuilder {
    vm: Arc<dyn Vm>,
}

impl ManualBuilder {
    pub fn new(vm: Arc<dyn Vm>) -> Self {
        Self { vm }
    }

    pub fn trigger_build(&self) {
        self.vm.notify_build_ready();
    }
}

#[async_trait]
impl Builder for ManualBuilder {
    fn kind(&self) -> BuilderKind {
        BuilderKind::Manual
    }

    fn queue_notify(&self) {}

    fn force_notify(&self) {
        self.trigger_build();
    }

    async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        wait_for_shutdown(&mut shutdown).await;
    }
}

/// Tuning for [`TimeBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeConfig {
    pub preferred_blocks_per_second: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            preferred_blocks_per_second: 2,
        }
    }
}

impl TimeConfig {
    /// Minimum spacing between two build signals.
    pub fn min_build_gap(&self) -> Duration {
        Duration::from_millis(1_000 / self.preferred_blocks_per_second.clamp(1, 1_000))
    }
}

/// Signals the host as soon as transactions arrive, but never more often than
/// the preferred block rate allows. A notification arriving inside the gap is
/// held and delivered by [`Builder::run`] once the gap has elapsed.
pub struct TimeBuilder {
    vm: Arc<dyn Vm>,
    config: TimeConfig,
    last_notify: Mutex<Option<Instant>>,
    pending: AtomicBool,
}

impl TimeBuilder {
    pub fn new(vm: Arc<dyn Vm>, config: TimeConfig) -> Self {
        Self {
            vm,
            config,
            last_notify: Mutex::new(None),
            pending: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &TimeConfig {
        &self.config
    }

    fn notify(&self, last: &mut Option<Instant>) {
        *last = Some(Instant::now());
        self.pending.store(false, Ordering::Release);
        self.vm.notify_build_ready();
    }

    fn gap_elapsed(&self, last: &Option<Instant>) -> bool {
        last.map(|at| at.elapsed() >= self.config.min_build_gap())
            .unwrap_or(true)
    }
}

#[async_trait]
impl Builder for TimeBuilder {
    fn kind(&self) -> BuilderKind {
        BuilderKind::Time
    }

    fn queue_notify(&self) {
        let mut last = self.last_notify.lock();
        if self.gap_elapsed(&last) {
            self.notify(&mut last);
        } else {
            self.pending.store(true, Ordering::Release);
        }
    }

    fn force_notify(&self) {
        let mut last = self.last_notify.lock();
        self.notify(&mut last);
    }

    async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.config.min_build_gap());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = wait_for_shutdown(&mut shutdown) => {
                    debug!("time builder stopped");
                    return;
                }
                _ = ticker.tick() => {
                    if !self.pending.load(Ordering::Acquire) {
                        continue;
                    }
                    let mut last = self.last_notify.lock();
                    if self.gap_elapsed(&last) {
                        self.notify(&mut last);
                    }
                }
            }
        }
    }
}
