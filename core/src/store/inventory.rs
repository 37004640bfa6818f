//! Free-floating inventory: commodity units awaiting sale and the
//! seed stock.
//!
//! A `CommodityUnit` is owned by exactly one place at a time — a grow
//! slot produces it, a station may hold it as the in-flight batch, and
//! this aggregate holds everything sellable. Units are destroyed when
//! fully sold or consumed as processing input.

use crate::{
    error::{SimError, SimResult},
    genetics::{GeneticEntity, Rarity},
    pricing,
    types::Drug,
};
use serde::{Deserialize, Serialize};

/// Smallest sellable remainder; units below this are dust and removed.
const GRAM_EPSILON: f64 = 1e-6;

/// Processing stage of a commodity unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BatchStage {
    /// Raw harvest output — sellable, but carries no purity.
    Harvested,
    /// Station output with an assigned purity.
    Refined,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommodityUnit {
    pub id:          String,
    pub strain_name: String,
    pub drug:        Drug,
    pub rarity:      Rarity,
    pub quality:     f64,
    pub purity:      Option<f64>,
    /// Extra purity the strain lineage grants at refinement time.
    /// Rolled into `purity` by the station, not by pricing.
    #[serde(default)]
    pub purity_bonus: f64,
    pub grams:       f64,
    pub stage:       BatchStage,
}

impl CommodityUnit {
    /// Quality score used for pricing and best-unit selection.
    pub fn effective_quality(&self) -> f64 {
        pricing::effective_quality(self.quality, self.purity)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    units: Vec<CommodityUnit>,
    seeds: Vec<GeneticEntity>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Commodity units ───────────────────────────────────────────

    pub fn deposit_unit(&mut self, unit: CommodityUnit) {
        if unit.grams > GRAM_EPSILON {
            self.units.push(unit);
        }
    }

    pub fn units(&self) -> &[CommodityUnit] {
        &self.units
    }

    pub fn unit(&self, unit_id: &str) -> SimResult<&CommodityUnit> {
        self.units
            .iter()
            .find(|u| u.id == unit_id)
            .ok_or_else(|| SimError::not_found("commodity unit", unit_id))
    }

    pub fn total_grams(&self, drug: Drug) -> f64 {
        self.units
            .iter()
            .filter(|u| u.drug == drug)
            .map(|u| u.grams)
            .sum()
    }

    pub fn total_grams_all(&self) -> f64 {
        self.units.iter().map(|u| u.grams).sum()
    }

    /// Best unit of `drug` by combined quality/purity, optionally
    /// requiring a minimum gram count. Returns the unit id.
    pub fn best_unit(&self, drug: Drug, min_grams: Option<f64>) -> Option<&CommodityUnit> {
        self.units
            .iter()
            .filter(|u| u.drug == drug)
            .filter(|u| min_grams.map_or(true, |g| u.grams + GRAM_EPSILON >= g))
            .max_by(|a, b| {
                a.effective_quality()
                    .partial_cmp(&b.effective_quality())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Best unit of any drug. Used by dealer agents.
    pub fn best_unit_any(&self) -> Option<&CommodityUnit> {
        self.units.iter().max_by(|a, b| {
            a.effective_quality()
                .partial_cmp(&b.effective_quality())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// First raw unit of `drug` suitable as processing input.
    pub fn first_raw_unit(&self, drug: Drug) -> Option<&CommodityUnit> {
        self.units
            .iter()
            .find(|u| u.drug == drug && u.stage == BatchStage::Harvested)
    }

    /// Deduct `grams` from a unit, removing it once emptied. Fails
    /// without mutation when the unit lacks the requested grams or the
    /// amount is not a positive number.
    pub fn withdraw(&mut self, unit_id: &str, grams: f64) -> SimResult<()> {
        if !(grams > 0.0) {
            return Err(SimError::invalid_state(format!(
                "cannot withdraw {grams}g, amount must be positive"
            )));
        }
        let idx = self
            .units
            .iter()
            .position(|u| u.id == unit_id)
            .ok_or_else(|| SimError::not_found("commodity unit", unit_id))?;
        let available = self.units[idx].grams;
        if available + GRAM_EPSILON < grams {
            return Err(SimError::InsufficientResource {
                resource: "grams",
                needed: grams,
                available,
            });
        }
        self.units[idx].grams -= grams;
        if self.units[idx].grams <= GRAM_EPSILON {
            self.units.remove(idx);
        }
        Ok(())
    }

    /// Remove a whole unit (processing input consumption).
    pub fn take_unit(&mut self, unit_id: &str) -> SimResult<CommodityUnit> {
        let idx = self
            .units
            .iter()
            .position(|u| u.id == unit_id)
            .ok_or_else(|| SimError::not_found("commodity unit", unit_id))?;
        Ok(self.units.remove(idx))
    }

    // ── Seed stock ────────────────────────────────────────────────

    pub fn add_seed(&mut self, seed: GeneticEntity) {
        self.seeds.push(seed);
    }

    pub fn seeds(&self) -> &[GeneticEntity] {
        &self.seeds
    }

    pub fn seed(&self, seed_id: &str) -> SimResult<&GeneticEntity> {
        self.seeds
            .iter()
            .find(|s| s.id == seed_id)
            .ok_or_else(|| SimError::not_found("seed", seed_id))
    }

    /// Oldest seed first — worker auto-planting is FIFO.
    pub fn take_seed_fifo(&mut self) -> Option<GeneticEntity> {
        if self.seeds.is_empty() {
            None
        } else {
            Some(self.seeds.remove(0))
        }
    }

    pub fn take_seed(&mut self, seed_id: &str) -> SimResult<GeneticEntity> {
        let idx = self
            .seeds
            .iter()
            .position(|s| s.id == seed_id)
            .ok_or_else(|| SimError::not_found("seed", seed_id))?;
        Ok(self.seeds.remove(idx))
    }
}
