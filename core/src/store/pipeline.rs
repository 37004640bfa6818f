//! Grow slots and processing stations — the production pipeline
//! aggregate and its stage machines.
//!
//! Failure policy: every operation is a no-op returning a `SimError`
//! when its precondition is unmet. Nothing here panics and nothing is
//! partially applied.

use crate::{
    config::{GrowthConfig, SimConfig},
    error::{SimError, SimResult},
    genetics::GeneticEntity,
    rng::SubsystemRng,
    store::inventory::{BatchStage, CommodityUnit},
    types::{clamp_pct, Drug, Minutes},
};
use serde::{Deserialize, Serialize};

/// Stations hold finished batches up to this progress value. The band
/// above 100 signals "ready, not yet collected" — worker agents only
/// collect at the ceiling, leaving the band for manual collection.
pub const STATION_OVERFLOW_CEILING: f64 = 105.0;

/// Plant growth stages, derived from progress via fixed thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum GrowStage {
    Seed,
    Sprout,
    Vegetative,
    Flowering,
    Mature,
}

impl GrowStage {
    /// The fixed progress → stage lookup: 0/20/45/70/100.
    pub fn from_progress(progress: f64) -> Self {
        if progress >= 100.0 {
            Self::Mature
        } else if progress >= 70.0 {
            Self::Flowering
        } else if progress >= 45.0 {
            Self::Vegetative
        } else if progress >= 20.0 {
            Self::Sprout
        } else {
            Self::Seed
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == Self::Mature
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowSlot {
    pub id:          usize,
    pub occupant:    Option<GeneticEntity>,
    pub stage:       GrowStage,
    pub progress:    f64,
    pub unlocked:    bool,
    pub water_level: f64,
}

impl GrowSlot {
    fn empty(id: usize, unlocked: bool) -> Self {
        Self {
            id,
            occupant: None,
            stage: GrowStage::Seed,
            progress: 0.0,
            unlocked,
            water_level: 100.0,
        }
    }

    fn reset(&mut self) {
        self.occupant = None;
        self.stage = GrowStage::Seed;
        self.progress = 0.0;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingStation {
    pub id:            usize,
    pub drug:          Drug,
    pub input_stage:   BatchStage,
    pub output_stage:  BatchStage,
    /// The in-flight OUTPUT batch. Computed at start_processing;
    /// released by collect once progress reaches 100.
    pub current_batch: Option<CommodityUnit>,
    pub progress:      f64,
    pub level:         u32,
    pub unlocked:      bool,
}

impl ProcessingStation {
    pub fn level_multiplier(&self) -> f64 {
        1.0 + (self.level.saturating_sub(1)) as f64 * 0.15
    }

    pub fn is_ready(&self) -> bool {
        self.current_batch.is_some() && self.progress >= 100.0
    }
}

/// What changed during a passive advance pass. The subsystem turns
/// these into events; the aggregate itself stays event-free.
#[derive(Debug, Clone)]
pub enum PipelineChange {
    PlantMatured { slot_id: usize, strain: String },
    StationReady { station_id: usize },
}

/// Everything harvest produces in one call.
#[derive(Debug, Clone)]
pub struct HarvestOutcome {
    pub unit:      CommodityUnit,
    pub seed_drop: Option<GeneticEntity>,
}

#[derive(Debug, Clone)]
pub struct PipelineStore {
    slots:    Vec<GrowSlot>,
    stations: Vec<ProcessingStation>,
}

impl PipelineStore {
    pub fn new(cfg: &SimConfig) -> Self {
        let slots = (0..cfg.grow_slots)
            .map(|i| GrowSlot::empty(i, i < cfg.unlocked_slots))
            .collect();

        let mut stations = Vec::new();
        let mut next_id = 0;
        for drug in Drug::ALL {
            if cfg.drug(drug).processing.is_none() {
                continue;
            }
            for _ in 0..cfg.stations_per_processed_drug {
                stations.push(ProcessingStation {
                    id: next_id,
                    drug,
                    input_stage: BatchStage::Harvested,
                    output_stage: BatchStage::Refined,
                    current_batch: None,
                    progress: 0.0,
                    level: 1,
                    unlocked: true,
                });
                next_id += 1;
            }
        }

        Self { slots, stations }
    }

    pub fn slots(&self) -> &[GrowSlot] {
        &self.slots
    }

    pub fn stations(&self) -> &[ProcessingStation] {
        &self.stations
    }

    pub fn slot(&self, slot_id: usize) -> SimResult<&GrowSlot> {
        self.slots
            .get(slot_id)
            .ok_or_else(|| SimError::not_found("grow slot", slot_id.to_string()))
    }

    fn slot_mut(&mut self, slot_id: usize) -> SimResult<&mut GrowSlot> {
        self.slots
            .get_mut(slot_id)
            .ok_or_else(|| SimError::not_found("grow slot", slot_id.to_string()))
    }

    pub fn station(&self, station_id: usize) -> SimResult<&ProcessingStation> {
        self.stations
            .get(station_id)
            .ok_or_else(|| SimError::not_found("station", station_id.to_string()))
    }

    fn station_mut(&mut self, station_id: usize) -> SimResult<&mut ProcessingStation> {
        self.stations
            .get_mut(station_id)
            .ok_or_else(|| SimError::not_found("station", station_id.to_string()))
    }

    /// Empty unlocked slots, in id order. Used by grower agents.
    pub fn empty_unlocked_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .filter(|s| s.unlocked && s.occupant.is_none())
            .map(|s| s.id)
            .collect()
    }

    /// Slots whose plant is at terminal stage.
    pub fn mature_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .filter(|s| s.occupant.is_some() && s.stage.is_terminal())
            .map(|s| s.id)
            .collect()
    }

    /// Idle unlocked station for `drug`, if any.
    pub fn idle_station(&self, drug: Drug) -> Option<usize> {
        self.stations
            .iter()
            .find(|s| s.unlocked && s.drug == drug && s.current_batch.is_none())
            .map(|s| s.id)
    }

    /// Stations at the overflow ceiling — the only ones agents collect.
    pub fn overflowed_stations(&self) -> Vec<usize> {
        self.stations
            .iter()
            .filter(|s| s.current_batch.is_some() && s.progress >= STATION_OVERFLOW_CEILING)
            .map(|s| s.id)
            .collect()
    }

    // ── Operations ────────────────────────────────────────────────

    pub fn plant(&mut self, slot_id: usize, genetics: GeneticEntity) -> SimResult<()> {
        let slot = self.slot_mut(slot_id)?;
        if !slot.unlocked {
            return Err(SimError::invalid_state(format!("slot {slot_id} is locked")));
        }
        if slot.occupant.is_some() {
            return Err(SimError::invalid_state(format!(
                "slot {slot_id} is already occupied"
            )));
        }
        slot.occupant = Some(genetics);
        slot.progress = 0.0;
        slot.stage = GrowStage::Seed;
        Ok(())
    }

    pub fn water(&mut self, slot_id: usize) -> SimResult<()> {
        let slot = self.slot_mut(slot_id)?;
        if !slot.unlocked {
            return Err(SimError::invalid_state(format!("slot {slot_id} is locked")));
        }
        slot.water_level = 100.0;
        Ok(())
    }

    /// Passive time advance for every slot and station.
    pub fn advance_all(
        &mut self,
        delta_minutes: Minutes,
        growth: &GrowthConfig,
        cfg: &SimConfig,
    ) -> Vec<PipelineChange> {
        let mut changes = Vec::new();

        for slot in &mut self.slots {
            let Some(genetics) = &slot.occupant else { continue };
            if slot.stage.is_terminal() {
                // Mature plants stop growing but keep drying the soil.
                slot.water_level = clamp_pct(
                    slot.water_level - growth.water_decay_per_minute * delta_minutes,
                );
                continue;
            }

            let dry = slot.water_level < growth.dry_threshold;
            let mut rate = growth.base_rate_per_minute * genetics.speed_multiplier();
            if dry {
                rate *= growth.dry_multiplier;
            }

            slot.progress = (slot.progress + rate * delta_minutes).min(100.0);
            slot.stage = GrowStage::from_progress(slot.progress);
            slot.water_level =
                clamp_pct(slot.water_level - growth.water_decay_per_minute * delta_minutes);

            // Already-mature slots bail out above, so this fires once.
            if slot.stage.is_terminal() {
                changes.push(PipelineChange::PlantMatured {
                    slot_id: slot.id,
                    strain: genetics.strain_name.clone(),
                });
            }
        }

        for station in &mut self.stations {
            let Some(batch) = &station.current_batch else {
                debug_assert_eq!(station.progress, 0.0);
                continue;
            };
            let proc = cfg
                .drug(batch.drug)
                .processing
                .as_ref()
                .expect("station exists only for processed drugs");
            let was_ready = station.progress >= STATION_OVERFLOW_CEILING;
            let rate = 100.0 / proc.duration_minutes * station.level_multiplier();
            station.progress =
                (station.progress + rate * delta_minutes).min(STATION_OVERFLOW_CEILING);
            if !was_ready && station.progress >= STATION_OVERFLOW_CEILING {
                changes.push(PipelineChange::StationReady {
                    station_id: station.id,
                });
            }
        }

        changes
    }

    /// Instantaneous progress from manual taps. Same formula as the
    /// passive advance, no elapsed time.
    pub fn boost(&mut self, slot_id: usize, taps: u32, growth: &GrowthConfig) -> SimResult<f64> {
        let boost_per_tap = growth.boost_per_tap;
        let dry_threshold = growth.dry_threshold;
        let dry_multiplier = growth.dry_multiplier;

        let slot = self.slot_mut(slot_id)?;
        let Some(genetics) = &slot.occupant else {
            return Err(SimError::invalid_state(format!("slot {slot_id} is empty")));
        };
        if slot.stage.is_terminal() {
            return Err(SimError::invalid_state(format!(
                "slot {slot_id} is ready to harvest"
            )));
        }

        let mut delta = boost_per_tap * genetics.speed_multiplier() * taps as f64;
        if slot.water_level < dry_threshold {
            delta *= dry_multiplier;
        }
        slot.progress = (slot.progress + delta).min(100.0);
        slot.stage = GrowStage::from_progress(slot.progress);
        Ok(slot.progress)
    }

    /// Harvest a mature plant. Resets the slot, rolls yield/quality,
    /// and may return a replacement seed of the same strain.
    pub fn harvest(
        &mut self,
        slot_id: usize,
        unit_id: String,
        seed_id: String,
        cfg: &SimConfig,
        rng: &mut SubsystemRng,
    ) -> SimResult<HarvestOutcome> {
        let slot = self.slot_mut(slot_id)?;
        let Some(genetics) = &slot.occupant else {
            return Err(SimError::invalid_state(format!("slot {slot_id} is empty")));
        };
        if !slot.stage.is_terminal() {
            return Err(SimError::invalid_state(format!(
                "slot {slot_id} is not mature (stage {:?})",
                slot.stage
            )));
        }

        let genetics = genetics.clone();
        let growth = &cfg.growth;
        let jitter = rng.range_f64(growth.yield_jitter_min, growth.yield_jitter_max);
        let grams = genetics.base_yield * genetics.yield_multiplier() * jitter;

        let rarity_cfg = &cfg.rarities[genetics.rarity.index()];
        let quality = clamp_pct(
            rarity_cfg.base_quality + genetics.quality_bonus() + rng.jitter(rarity_cfg.quality_jitter),
        );

        let seed_drop = if rng.chance(growth.seed_drop_chance) {
            let mut replacement = genetics.clone();
            replacement.id = seed_id;
            Some(replacement)
        } else {
            None
        };

        slot.reset();

        Ok(HarvestOutcome {
            unit: CommodityUnit {
                id: unit_id,
                strain_name: genetics.strain_name.clone(),
                drug: genetics.drug,
                rarity: genetics.rarity,
                quality,
                purity: None,
                purity_bonus: genetics.purity_bonus,
                grams,
                stage: BatchStage::Harvested,
            },
            seed_drop,
        })
    }

    /// Precondition check for `start_processing`. Callers take the
    /// input out of inventory only after this passes, so a failed
    /// start never consumes the offered unit.
    pub fn can_accept(&self, station_id: usize, input: &CommodityUnit) -> SimResult<()> {
        let station = self.station(station_id)?;
        if !station.unlocked {
            return Err(SimError::invalid_state(format!(
                "station {station_id} is locked"
            )));
        }
        if station.current_batch.is_some() {
            return Err(SimError::invalid_state(format!(
                "station {station_id} already holds a batch"
            )));
        }
        if input.drug != station.drug || input.stage != station.input_stage {
            return Err(SimError::ineligible(format!(
                "station {station_id} takes {} at stage {:?}",
                station.drug.as_str(),
                station.input_stage
            )));
        }
        Ok(())
    }

    /// Start refining `input` in a station. The output batch is
    /// computed up front; it becomes collectable at progress 100.
    pub fn start_processing(
        &mut self,
        station_id: usize,
        input: CommodityUnit,
        cfg: &SimConfig,
    ) -> SimResult<()> {
        self.can_accept(station_id, &input)?;
        let station = self.station_mut(station_id)?;

        let proc = cfg
            .drug(station.drug)
            .processing
            .as_ref()
            .expect("station exists only for processed drugs");
        let level_bonus = (station.level.saturating_sub(1)) as f64 * 4.0;
        // The strain lineage bonus from breeding lands here.
        let purity = (input.purity.unwrap_or(proc.base_purity)
            + proc.purity_flat_bonus
            + level_bonus
            + input.purity_bonus)
            .min(100.0);

        let output = CommodityUnit {
            id: input.id.clone(),
            strain_name: input.strain_name.clone(),
            drug: input.drug,
            rarity: input.rarity,
            quality: input.quality,
            purity: Some(purity),
            purity_bonus: input.purity_bonus,
            grams: input.grams * proc.retention_rate,
            stage: station.output_stage,
        };
        station.current_batch = Some(output);
        station.progress = 0.0;
        Ok(())
    }

    /// Collect a finished batch. Valid from progress 100 upward.
    pub fn collect(&mut self, station_id: usize) -> SimResult<CommodityUnit> {
        let station = self.station_mut(station_id)?;
        if station.current_batch.is_none() {
            return Err(SimError::invalid_state(format!(
                "station {station_id} holds no batch"
            )));
        }
        if station.progress < 100.0 {
            return Err(SimError::invalid_state(format!(
                "station {station_id} is still processing ({:.0}%)",
                station.progress
            )));
        }
        let batch = station.current_batch.take().expect("checked above");
        station.progress = 0.0;
        Ok(batch)
    }

    /// Unlock the first locked slot. Caller has already debited cash.
    pub fn unlock_next_slot(&mut self) -> SimResult<usize> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| !s.unlocked)
            .ok_or_else(|| SimError::invalid_state("all slots are unlocked"))?;
        slot.unlocked = true;
        Ok(slot.id)
    }
}
