//! Balance configuration for the whole simulation.
//!
//! Every tunable number lives here: drug pricing tables, urgency
//! tiers, rarity bases, growth rates, worker economics and breeding
//! weights. Subsystems read these tables and never hardcode balance
//! values. `SimConfig::default_balance()` is the shipped tuning;
//! `load()` reads the same shape from a JSON file for balancing runs.

use crate::types::{Cash, Drug, Minutes, Tick, Urgency};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Drugs & pricing ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugConfig {
    pub base_price:        f64,
    /// quality multiplier = quality_mult_base + q/100 * quality_mult_span
    pub quality_mult_base: f64,
    pub quality_mult_span: f64,
    /// Hard per-gram cap applied after all multipliers. Economic
    /// balancing valve — not every drug has one.
    pub price_ceiling:     Option<f64>,
    /// Present only for drugs that pass through a processing station.
    pub processing:        Option<ProcessingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// grams out per gram in.
    pub retention_rate:   f64,
    /// Purity assigned to raw input that carries none.
    pub base_purity:      f64,
    /// Flat purity gain per refinement pass.
    pub purity_flat_bonus: f64,
    /// Minutes of station work for a full batch at level 1.
    pub duration_minutes: Minutes,
}

// ── Growing ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthConfig {
    /// Progress percent per minute at growth_speed 1.0, watered.
    pub base_rate_per_minute: f64,
    /// Water percent lost per minute.
    pub water_decay_per_minute: f64,
    /// Below this water level growth runs at `dry_multiplier`.
    pub dry_threshold:  f64,
    pub dry_multiplier: f64,
    /// Progress delta for one manual boost tap.
    pub boost_per_tap:  f64,
    pub seed_drop_chance: f64,
    pub yield_jitter_min: f64,
    pub yield_jitter_max: f64,
    /// Cash cost to unlock the next grow slot.
    pub slot_unlock_cost: Cash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RarityConfig {
    pub base_quality:   f64,
    pub quality_jitter: f64,
}

// ── Customers & demand ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrgencyConfig {
    pub grams_min:      f64,
    pub grams_max:      f64,
    pub expiry_minutes: Minutes,
    pub price_mult:     f64,
    pub loyalty_penalty:      f64,
    pub satisfaction_penalty: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandConfig {
    /// Minimum minutes between a fulfilled purchase and the next
    /// scheduled request.
    pub request_cooldown_minutes: Minutes,
    /// Scheduled gap between requests: cooldown + U[0, this].
    pub request_spread_minutes: Minutes,
    /// Per-minute spontaneous-request probability at addiction 100.
    /// Scales linearly with addiction; effectively ~0.3 above 80.
    pub spontaneous_rate_max: f64,
    /// Addiction gained per gram bought of that drug.
    pub addiction_per_gram: f64,
    pub loyalty_per_sale:      f64,
    pub satisfaction_per_sale: f64,
    /// Customers below this satisfaction are removed from the ledger.
    pub churn_satisfaction_threshold: f64,
    /// Sample conversion probability = base + quality/100 * span.
    pub sample_conversion_base: f64,
    pub sample_conversion_span: f64,
    /// Loyalty granted on conversion (pulls status to Active).
    pub conversion_loyalty: f64,
    /// Addiction seeded by a converting sample or an accepted offer.
    pub seeded_addiction: f64,
    pub initial_prospects: usize,
    /// Per-minute chance of a new walk-in prospect.
    pub prospect_walk_in_rate: f64,
    /// Adventurous personalities accept a cross-drug offer at this rate.
    pub adventurous_accept_chance: f64,
    /// Loyalty lost when a casual customer rejects an offer.
    pub offer_rejection_penalty: f64,
}

// ── Workers ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub hire_cost_grower:    Cash,
    pub hire_cost_processor: Cash,
    pub hire_cost_dealer:    Cash,
    /// Dealer sales per tick = base + level / per_level_divisor.
    pub dealer_base_quota:   u32,
    pub dealer_quota_per_level: u32,
    /// Dealer gram range per sale: [min, base_max + level * per_level].
    pub dealer_grams_min:    f64,
    pub dealer_grams_max_base: f64,
    pub dealer_grams_max_per_level: f64,
    /// Price bonus multiplier per dealer level.
    pub dealer_price_bonus_per_level: f64,
    /// Wholesale fallback when the local stash runs dry: batch size,
    /// cost per gram, and the quality of the imported cut.
    pub import_batch_grams:   f64,
    pub import_cost_per_gram: f64,
    pub import_quality:       f64,
    /// Probability an idle agent writes an idle log line.
    pub idle_log_chance: f64,
}

// ── Breeding ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreedingConfig {
    /// Base weights for Fail/Poor/Normal/Good/Excellent/Godtier.
    pub outcome_weights: [f64; 6],
    /// Weight mass shifted from the low tiers to the high tiers per
    /// point of combined parent rarity index.
    pub rarity_weight_shift: f64,
    /// Additional shift per parent generation.
    pub generation_weight_shift: f64,
    /// Chance each parent trait is inherited.
    pub trait_inherit_chance: f64,
    /// Chance of a bonus novel trait per tier (Fail..Godtier).
    pub novel_trait_chance: [f64; 6],
    /// Purity bonus carried by the offspring per tier.
    pub purity_bonus: [f64; 6],
    /// Yield factor applied to the parent average per tier.
    pub yield_factor: [f64; 6],
}

// ── Top level ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub drugs:     HashMap<Drug, DrugConfig>,
    pub growth:    GrowthConfig,
    pub rarities:  Vec<RarityConfig>, // indexed by Rarity as usize
    pub urgency:   HashMap<Urgency, UrgencyConfig>,
    pub demand:    DemandConfig,
    pub workers:   WorkerConfig,
    pub breeding:  BreedingConfig,
    pub grow_slots:      usize,
    pub unlocked_slots:  usize,
    pub stations_per_processed_drug: usize,
    pub starting_cash:   Cash,
    pub starting_seeds:  usize,
    pub activity_log_capacity: usize,
    /// Demand subsystem runs its full scoring pass every N ticks.
    pub demand_pass_interval: Tick,
}

impl SimConfig {
    /// Load from a JSON file. In tests, use `default_balance()`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// The shipped balance tuning.
    pub fn default_balance() -> Self {
        let mut drugs = HashMap::new();
        drugs.insert(
            Drug::Weed,
            DrugConfig {
                base_price:        12.0,
                quality_mult_base: 0.55,
                quality_mult_span: 1.4,
                price_ceiling:     None,
                processing:        None,
            },
        );
        drugs.insert(
            Drug::Koks,
            DrugConfig {
                base_price:        80.0,
                quality_mult_base: 0.55,
                quality_mult_span: 1.4,
                price_ceiling:     None,
                processing: Some(ProcessingConfig {
                    retention_rate:    0.35,
                    base_purity:       25.0,
                    purity_flat_bonus: 18.0,
                    duration_minutes:  45.0,
                }),
            },
        );
        drugs.insert(
            Drug::Meth,
            DrugConfig {
                base_price:        55.0,
                quality_mult_base: 0.55,
                quality_mult_span: 1.4,
                // Meth outsells everything at high purity — capped to
                // keep the late game from collapsing into one product.
                price_ceiling:     Some(95.0),
                processing: Some(ProcessingConfig {
                    retention_rate:    0.45,
                    base_purity:       30.0,
                    purity_flat_bonus: 15.0,
                    duration_minutes:  60.0,
                }),
            },
        );

        let mut urgency = HashMap::new();
        urgency.insert(Urgency::Low, UrgencyConfig {
            grams_min: 1.0,
            grams_max: 3.0,
            expiry_minutes: 180.0,
            price_mult: 0.9,
            loyalty_penalty: 2.0,
            satisfaction_penalty: 2.0,
        });
        urgency.insert(Urgency::Medium, UrgencyConfig {
            grams_min: 3.0,
            grams_max: 7.0,
            expiry_minutes: 90.0,
            price_mult: 1.0,
            loyalty_penalty: 4.0,
            satisfaction_penalty: 5.0,
        });
        urgency.insert(Urgency::High, UrgencyConfig {
            grams_min: 7.0,
            grams_max: 15.0,
            expiry_minutes: 30.0,
            price_mult: 1.15,
            loyalty_penalty: 7.0,
            satisfaction_penalty: 9.0,
        });
        urgency.insert(Urgency::Desperate, UrgencyConfig {
            grams_min: 15.0,
            grams_max: 30.0,
            expiry_minutes: 5.0,
            price_mult: 1.35,
            loyalty_penalty: 12.0,
            satisfaction_penalty: 16.0,
        });

        Self {
            drugs,
            growth: GrowthConfig {
                base_rate_per_minute:   0.6,
                water_decay_per_minute: 0.35,
                dry_threshold:  20.0,
                dry_multiplier: 0.5,
                boost_per_tap:  1.5,
                seed_drop_chance: 0.25,
                yield_jitter_min: 0.8,
                yield_jitter_max: 1.2,
                slot_unlock_cost: 500,
            },
            // Common, Uncommon, Rare, Epic, Legendary
            rarities: vec![
                RarityConfig { base_quality: 42.0, quality_jitter: 8.0 },
                RarityConfig { base_quality: 55.0, quality_jitter: 8.0 },
                RarityConfig { base_quality: 68.0, quality_jitter: 7.0 },
                RarityConfig { base_quality: 80.0, quality_jitter: 6.0 },
                RarityConfig { base_quality: 92.0, quality_jitter: 5.0 },
            ],
            urgency,
            demand: DemandConfig {
                request_cooldown_minutes: 30.0,
                request_spread_minutes:   120.0,
                spontaneous_rate_max:     0.3,
                addiction_per_gram:       0.6,
                loyalty_per_sale:         2.5,
                satisfaction_per_sale:    4.0,
                churn_satisfaction_threshold: 30.0,
                sample_conversion_base:   0.3,
                sample_conversion_span:   0.5,
                conversion_loyalty:       5.0,
                seeded_addiction:         15.0,
                initial_prospects:        6,
                prospect_walk_in_rate:    0.015,
                adventurous_accept_chance: 0.45,
                offer_rejection_penalty:  3.0,
            },
            workers: WorkerConfig {
                hire_cost_grower:    800,
                hire_cost_processor: 1200,
                hire_cost_dealer:    1500,
                dealer_base_quota:   1,
                dealer_quota_per_level: 2,
                dealer_grams_min:    2.0,
                dealer_grams_max_base: 4.0,
                dealer_grams_max_per_level: 2.0,
                dealer_price_bonus_per_level: 0.03,
                import_batch_grams:   12.0,
                import_cost_per_gram: 6.0,
                import_quality:       45.0,
                idle_log_chance: 0.25,
            },
            breeding: BreedingConfig {
                outcome_weights: [15.0, 20.0, 30.0, 20.0, 12.0, 3.0],
                rarity_weight_shift:     2.0,
                generation_weight_shift: 0.5,
                trait_inherit_chance:    0.55,
                novel_trait_chance: [0.0, 0.0, 0.05, 0.15, 0.35, 1.0],
                purity_bonus:       [0.0, 0.0, 2.0, 4.0, 7.0, 12.0],
                yield_factor:       [0.7, 0.85, 1.0, 1.15, 1.3, 1.5],
            },
            grow_slots:     8,
            unlocked_slots: 3,
            stations_per_processed_drug: 1,
            starting_cash:  1000,
            starting_seeds: 3,
            activity_log_capacity: 48,
            demand_pass_interval: 1,
        }
    }

    pub fn drug(&self, drug: Drug) -> &DrugConfig {
        // Every Drug variant is present in every config; enforced by
        // default_balance() and checked on load.
        &self.drugs[&drug]
    }

    pub fn urgency(&self, tier: Urgency) -> &UrgencyConfig {
        &self.urgency[&tier]
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::default_balance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_balance_covers_all_drugs() {
        let cfg = SimConfig::default_balance();
        for drug in Drug::ALL {
            assert!(cfg.drugs.contains_key(&drug), "missing {drug:?}");
        }
        assert_eq!(cfg.rarities.len(), 5);
        for tier in [Urgency::Low, Urgency::Medium, Urgency::High, Urgency::Desperate] {
            assert!(cfg.urgency.contains_key(&tier));
        }
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = SimConfig::default_balance();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.drugs.len(), cfg.drugs.len());
        assert_eq!(back.starting_cash, cfg.starting_cash);
    }
}
