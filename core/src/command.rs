//! The player-facing command surface.
//!
//! Commands are synchronous: the presentation layer calls
//! `SimEngine::execute` (or the typed methods directly) and gets a
//! `SimResult<CommandOutcome>` back. Expected rejections (locked slot,
//! not enough grams) come back as `SimError`; modeled business results
//! (a rejected offer, a failed breeding) are `Ok` outcomes.

use crate::{
    genetics::{OutcomeTier, Rarity},
    store::worker::WorkerRole,
    types::{Cash, Drug},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    Plant { slot_id: usize, seed_id: String },
    Water { slot_id: usize },
    Boost { slot_id: usize, taps: u32 },
    Harvest { slot_id: usize },
    StartProcessing { station_id: usize, unit_id: String },
    Collect { station_id: usize },
    UnlockSlot,
    Sell { customer_id: String, unit_id: String, grams: f64 },
    GiveSample { customer_id: String, unit_id: String },
    FulfillRequest { customer_id: String },
    IgnoreRequest { customer_id: String },
    OfferDrug { customer_id: String, drug: Drug },
    HireWorker { role: WorkerRole },
    ToggleWorkerPause { worker_id: String },
    Breed { seed_a: String, seed_b: String },
}

/// What a successful command reports back. Tagged `kind` on the wire;
/// `outcome` stays free for variant payloads like `Bred`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandOutcome {
    Planted { slot_id: usize, strain: String },
    Watered { slot_id: usize },
    Boosted { slot_id: usize, progress: f64 },
    Harvested {
        unit_id: String,
        grams: f64,
        quality: f64,
        seed_drop: bool,
    },
    ProcessingStarted { station_id: usize, grams_in: f64 },
    Collected {
        unit_id: String,
        grams: f64,
        purity: f64,
    },
    SlotUnlocked { slot_id: usize, cost: Cash },
    Sold { revenue: Cash },
    SampleResult { converted: bool },
    RequestFulfilled { revenue: Cash },
    RequestIgnored,
    OfferResult { accepted: bool, blocked: bool },
    WorkerHired { worker_id: String, name: String },
    WorkerPause { paused: bool },
    Bred {
        offspring_id: String,
        strain: String,
        outcome: OutcomeTier,
        rarity: Rarity,
        generation: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bred_outcome_serializes_with_both_tag_and_payload_field() {
        let outcome = CommandOutcome::Bred {
            offspring_id: "seed-9".into(),
            strain: "Test Cross".into(),
            outcome: OutcomeTier::Good,
            rarity: Rarity::Rare,
            generation: 2,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["kind"], "bred");
        assert_eq!(v["outcome"], "good");

        let back: CommandOutcome = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, CommandOutcome::Bred { generation: 2, .. }));
    }
}
