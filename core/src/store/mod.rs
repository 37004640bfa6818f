//! The world state — every domain aggregate of the simulation.
//!
//! RULE: Only aggregates mutate their own entities. Subsystems and
//! the engine call aggregate methods — they never reach into fields
//! of another domain. Cross-domain effects (a sale touching inventory,
//! cash, and a customer) are explicit multi-step calls that validate
//! all preconditions before the first mutation.

pub mod customer;
pub mod inventory;
pub mod pipeline;
pub mod worker;

use crate::{
    config::SimConfig,
    error::{SimError, SimResult},
    event::ActivityLog,
    genetics::{GeneticEntity, Rarity},
    types::{Cash, Drug},
};

use customer::CustomerLedger;
use inventory::InventoryStore;
use pipeline::PipelineStore;
use worker::WorkerRoster;

pub struct WorldState {
    cash: Cash,
    pub inventory: InventoryStore,
    pub pipeline:  PipelineStore,
    pub customers: CustomerLedger,
    pub workers:   WorkerRoster,
    pub activity:  ActivityLog,
    /// Monotonic counter backing deterministic entity ids.
    next_id: u64,
}

impl WorldState {
    pub fn new(cfg: &SimConfig) -> Self {
        let mut world = Self {
            cash: cfg.starting_cash,
            inventory: InventoryStore::new(),
            pipeline: PipelineStore::new(cfg),
            customers: CustomerLedger::new(),
            workers: WorkerRoster::new(),
            activity: ActivityLog::new(cfg.activity_log_capacity),
            next_id: 0,
        };
        for _ in 0..cfg.starting_seeds {
            let id = world.next_id("seed");
            world.inventory.add_seed(GeneticEntity::starter(
                id,
                "Bush Weed".into(),
                Drug::Weed,
                Rarity::Common,
            ));
        }
        world
    }

    /// Deterministic entity id: prefix + monotonic counter. Keeps ids
    /// stable across same-seed runs so event logs compare byte-equal.
    pub fn next_id(&mut self, prefix: &str) -> String {
        let n = self.next_id;
        self.next_id += 1;
        format!("{prefix}-{n:05}")
    }

    // ── Cash ──────────────────────────────────────────────────────

    pub fn cash(&self) -> Cash {
        self.cash
    }

    pub fn credit(&mut self, amount: Cash) {
        debug_assert!(amount >= 0, "credit takes non-negative amounts");
        self.cash += amount;
    }

    pub fn debit(&mut self, amount: Cash) -> SimResult<()> {
        debug_assert!(amount >= 0, "debit takes non-negative amounts");
        if self.cash < amount {
            return Err(SimError::InsufficientResource {
                resource: "cash",
                needed: amount as f64,
                available: self.cash as f64,
            });
        }
        self.cash -= amount;
        Ok(())
    }
}
