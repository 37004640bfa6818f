//! Deterministic tick-driven economy simulation for a drug-empire
//! idle game: grow pipelines, a pricing engine, a customer ledger
//! with addiction-driven demand, worker automation, and strain
//! breeding. Same seed + same inputs = byte-identical event logs.

pub mod clock;
pub mod command;
pub mod config;
pub mod demand_subsystem;
pub mod engine;
pub mod error;
pub mod event;
pub mod genetics;
pub mod name_generator;
pub mod pipeline_subsystem;
pub mod pricing;
pub mod rng;
pub mod snapshot;
pub mod store;
pub mod subsystem;
pub mod types;
pub mod worker_subsystem;

pub use command::{CommandOutcome, PlayerCommand};
pub use config::SimConfig;
pub use engine::SimEngine;
pub use error::{SimError, SimResult};
pub use snapshot::WorldSnapshot;
