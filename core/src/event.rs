//! The event surface — all inter-subsystem communication plus the
//! bounded human-readable activity log for the presentation layer.
//!
//! RULE: Subsystems communicate ONLY through events and aggregate
//! methods. A subsystem never reads another subsystem's internals.

use crate::types::{Cash, EntityId, Minutes, Tick, Urgency};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Every event emitted during simulation.
/// Variants are added over time — never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    TickStarted { tick: Tick },
    TickCompleted { tick: Tick },
    RunInitialized { run_id: String, seed: u64 },

    // ── Pipeline events ────────────────────────────
    SeedPlanted {
        tick: Tick,
        slot_id: usize,
        strain: String,
    },
    PlantMatured {
        tick: Tick,
        slot_id: usize,
        strain: String,
    },
    PlantHarvested {
        tick: Tick,
        slot_id: usize,
        strain: String,
        grams: f64,
        quality: f64,
        seed_drop: bool,
    },
    ProcessingStarted {
        tick: Tick,
        station_id: usize,
        drug: crate::types::Drug,
        grams_in: f64,
    },
    BatchReady {
        tick: Tick,
        station_id: usize,
    },
    BatchCollected {
        tick: Tick,
        station_id: usize,
        drug: crate::types::Drug,
        grams: f64,
        purity: f64,
    },
    SlotUnlocked {
        tick: Tick,
        slot_id: usize,
        cost: Cash,
    },

    // ── Customer ledger events ─────────────────────
    ProspectAcquired {
        tick: Tick,
        customer_id: EntityId,
        name: String,
    },
    SampleGiven {
        tick: Tick,
        customer_id: EntityId,
        drug: crate::types::Drug,
        quality: f64,
        converted: bool,
    },
    RequestIssued {
        tick: Tick,
        customer_id: EntityId,
        request_id: EntityId,
        drug: crate::types::Drug,
        grams: f64,
        urgency: Urgency,
        max_price: Cash,
        expires_at_minutes: Minutes,
        spontaneous: bool,
    },
    RequestFulfilled {
        tick: Tick,
        customer_id: EntityId,
        request_id: EntityId,
        drug: crate::types::Drug,
        grams: f64,
        revenue: Cash,
    },
    RequestExpired {
        tick: Tick,
        customer_id: EntityId,
        request_id: EntityId,
        urgency: Urgency,
        loyalty_penalty: f64,
    },
    RequestIgnored {
        tick: Tick,
        customer_id: EntityId,
        request_id: EntityId,
    },
    SaleCompleted {
        tick: Tick,
        customer_id: EntityId,
        drug: crate::types::Drug,
        grams: f64,
        revenue: Cash,
        seller: String,
    },
    OfferAccepted {
        tick: Tick,
        customer_id: EntityId,
        drug: crate::types::Drug,
    },
    OfferRejected {
        tick: Tick,
        customer_id: EntityId,
        drug: crate::types::Drug,
        blocked: bool,
    },
    CustomerChurned {
        tick: Tick,
        customer_id: EntityId,
        reason: String,
    },

    // ── Worker events ──────────────────────────────
    WorkerHired {
        tick: Tick,
        worker_id: EntityId,
        role: String,
        cost: Cash,
    },
    WorkerPauseToggled {
        tick: Tick,
        worker_id: EntityId,
        paused: bool,
    },
    WorkerIdled {
        tick: Tick,
        worker_id: EntityId,
    },
    StockImported {
        tick: Tick,
        worker_id: EntityId,
        drug: crate::types::Drug,
        grams: f64,
        cost: Cash,
    },

    // ── Breeding events ────────────────────────────
    BreedingCompleted {
        tick: Tick,
        offspring_id: EntityId,
        strain: String,
        outcome: crate::genetics::OutcomeTier,
        rarity: crate::genetics::Rarity,
        generation: u32,
    },
}

impl SimEvent {
    /// Stable string name for the event_type column of the log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::TickStarted { .. } => "tick_started",
            Self::TickCompleted { .. } => "tick_completed",
            Self::RunInitialized { .. } => "run_initialized",
            Self::SeedPlanted { .. } => "seed_planted",
            Self::PlantMatured { .. } => "plant_matured",
            Self::PlantHarvested { .. } => "plant_harvested",
            Self::ProcessingStarted { .. } => "processing_started",
            Self::BatchReady { .. } => "batch_ready",
            Self::BatchCollected { .. } => "batch_collected",
            Self::SlotUnlocked { .. } => "slot_unlocked",
            Self::ProspectAcquired { .. } => "prospect_acquired",
            Self::SampleGiven { .. } => "sample_given",
            Self::RequestIssued { .. } => "request_issued",
            Self::RequestFulfilled { .. } => "request_fulfilled",
            Self::RequestExpired { .. } => "request_expired",
            Self::RequestIgnored { .. } => "request_ignored",
            Self::SaleCompleted { .. } => "sale_completed",
            Self::OfferAccepted { .. } => "offer_accepted",
            Self::OfferRejected { .. } => "offer_rejected",
            Self::CustomerChurned { .. } => "customer_churned",
            Self::WorkerHired { .. } => "worker_hired",
            Self::WorkerPauseToggled { .. } => "worker_pause_toggled",
            Self::WorkerIdled { .. } => "worker_idled",
            Self::StockImported { .. } => "stock_imported",
            Self::BreedingCompleted { .. } => "breeding_completed",
        }
    }
}

/// One row of the append-only event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub run_id:     String,
    pub tick:       Tick,
    pub subsystem:  String,
    pub event_type: String,
    pub payload:    String, // JSON-serialized SimEvent
}

/// One human-readable activity line with structured metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub tick:    Tick,
    pub minutes: Minutes,
    pub actor:   String,
    pub message: String,
    pub grams:   Option<f64>,
    pub revenue: Option<Cash>,
}

/// Bounded append-only log for the presentation layer. Oldest entries
/// fall off the front once capacity is reached.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries:  VecDeque<ActivityEntry>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: ActivityEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest-last view of the retained entries.
    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tick: Tick) -> ActivityEntry {
        ActivityEntry {
            tick,
            minutes: tick as f64,
            actor: "test".into(),
            message: "line".into(),
            grams: None,
            revenue: None,
        }
    }

    #[test]
    fn activity_log_is_bounded() {
        let mut log = ActivityLog::new(3);
        for t in 0..10 {
            log.push(entry(t));
        }
        assert_eq!(log.len(), 3);
        let ticks: Vec<Tick> = log.entries().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![7, 8, 9]);
    }
}
