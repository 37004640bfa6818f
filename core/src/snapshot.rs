//! Read-only world snapshot for the presentation layer.
//!
//! A snapshot is a plain serializable copy of everything a UI frame
//! needs. Taking one never mutates the world.

use crate::{
    engine::SimEngine,
    event::ActivityEntry,
    genetics::GeneticEntity,
    store::{
        customer::Customer,
        inventory::CommodityUnit,
        pipeline::{GrowSlot, ProcessingStation},
        worker::WorkerAgent,
    },
    types::{Cash, Minutes, Tick},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub run_id:  String,
    pub tick:    Tick,
    pub minutes: Minutes,
    pub paused:  bool,
    pub cash:    Cash,
    pub slots:     Vec<GrowSlot>,
    pub stations:  Vec<ProcessingStation>,
    pub units:     Vec<CommodityUnit>,
    pub seeds:     Vec<GeneticEntity>,
    pub customers: Vec<Customer>,
    pub workers:   Vec<WorkerAgent>,
    pub activity:  Vec<ActivityEntry>,
}

impl WorldSnapshot {
    pub fn take(engine: &SimEngine) -> Self {
        let clock = engine.clock();
        let world = engine.world();
        Self {
            run_id: engine.run_id().to_string(),
            tick: clock.current_tick,
            minutes: clock.minutes,
            paused: clock.paused,
            cash: world.cash(),
            slots: world.pipeline.slots().to_vec(),
            stations: world.pipeline.stations().to_vec(),
            units: world.inventory.units().to_vec(),
            seeds: world.inventory.seeds().to_vec(),
            customers: world.customers.iter().cloned().collect(),
            workers: world.workers.iter().cloned().collect(),
            activity: world.activity.entries().cloned().collect(),
        }
    }
}
