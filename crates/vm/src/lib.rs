//! Contracts between the seqchain controller and the VM host framework.
//!
//! The host owns consensus, block propagation and state commitment. It drives
//! a [`Controller`] through initialization and block notifications, and runs
//! the [`Builder`] and [`Gossiper`] strategies the controller selects.

pub mod builder;
pub mod controller;
pub mod gossiper;
pub mod host;
pub mod mock;
pub mod rules;
pub mod state;

pub use builder::{Builder, BuilderKind, ManualBuilder, TimeBuilder, TimeConfig};
pub use controller::{Controller, Handlers, Initialized, VmConfig, VmGenesis};
pub use gossiper::{Gossiper, GossiperKind, ManualGossiper, ProposerConfig, ProposerGossiper};
pub use host::{wait_for_shutdown, ChainContext, GossipTarget, Vm};
pub use rules::{Rules, StorageUnits};
pub use state::StateManager;
