//! The worker roster — ownable automation agents.
//!
//! `owned` is one-way: hiring never reverses. `paused` is freely
//! toggled by the presentation layer.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkerRole {
    Grower,
    Processor,
    Dealer,
}

impl WorkerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grower => "grower",
            Self::Processor => "processor",
            Self::Dealer => "dealer",
        }
    }

    pub fn default_abilities(&self) -> BTreeSet<WorkerAbility> {
        let mut set = BTreeSet::new();
        match self {
            Self::Grower => {
                set.insert(WorkerAbility::AutoPlant);
                set.insert(WorkerAbility::AutoHarvest);
            }
            Self::Processor => {
                set.insert(WorkerAbility::AutoProcess);
            }
            Self::Dealer => {
                set.insert(WorkerAbility::Sell);
            }
        }
        set
    }
}

/// Which pipeline/ledger operations an agent may perform per tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WorkerAbility {
    AutoPlant,
    AutoHarvest,
    AutoProcess,
    Sell,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerAgent {
    pub id:        String,
    pub name:      String,
    pub role:      WorkerRole,
    pub owned:     bool,
    pub paused:    bool,
    pub level:     u32,
    pub abilities: BTreeSet<WorkerAbility>,
}

impl WorkerAgent {
    pub fn is_active(&self) -> bool {
        self.owned && !self.paused
    }

    pub fn has(&self, ability: WorkerAbility) -> bool {
        self.abilities.contains(&ability)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkerRoster {
    workers: Vec<WorkerAgent>,
}

impl WorkerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hire(&mut self, id: String, name: String, role: WorkerRole) -> &WorkerAgent {
        self.workers.push(WorkerAgent {
            id,
            name,
            role,
            owned: true,
            paused: false,
            level: 1,
            abilities: role.default_abilities(),
        });
        self.workers.last().expect("just pushed")
    }

    pub fn get(&self, id: &str) -> SimResult<&WorkerAgent> {
        self.workers
            .iter()
            .find(|w| w.id == id)
            .ok_or_else(|| SimError::not_found("worker", id))
    }

    pub fn toggle_pause(&mut self, id: &str) -> SimResult<bool> {
        let w = self
            .workers
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| SimError::not_found("worker", id))?;
        w.paused = !w.paused;
        Ok(w.paused)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkerAgent> {
        self.workers.iter()
    }

    /// Owned, unpaused agents in hire order — the per-tick actors.
    pub fn active_ids(&self) -> Vec<String> {
        self.workers
            .iter()
            .filter(|w| w.is_active())
            .map(|w| w.id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}
