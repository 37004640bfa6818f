//! Worker subsystem — hired agents acting on the world each tick.
//!
//! Agents run in hire order and mutate the world sequentially, so two
//! dealers can never sell the same grams twice: the second dealer sees
//! the inventory the first one left behind. Every action an agent takes
//! is a call into the same aggregate methods the player commands use.

use crate::{
    config::SimConfig,
    error::SimResult,
    event::{ActivityEntry, SimEvent},
    genetics::Rarity,
    name_generator::NameGenerator,
    pricing,
    rng::SubsystemRng,
    store::{
        inventory::{BatchStage, CommodityUnit},
        worker::WorkerRole,
        WorldState,
    },
    subsystem::{SimSubsystem, TickCtx},
    types::{Cash, Drug},
};

pub struct WorkerSubsystem {
    config: SimConfig,
}

impl WorkerSubsystem {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    /// Plant empty unlocked slots from the seed stock (oldest seed
    /// first), then harvest every mature slot. Slots freed by the
    /// harvest pass wait for the next tick.
    fn run_grower(
        &self,
        ctx: &TickCtx,
        world: &mut WorldState,
        rng: &mut SubsystemRng,
        name: &str,
        events: &mut Vec<SimEvent>,
    ) -> SimResult<bool> {
        let mut worked = false;

        for slot_id in world.pipeline.empty_unlocked_slots() {
            let Some(seed) = world.inventory.take_seed_fifo() else {
                break;
            };
            let strain = seed.strain_name.clone();
            world.pipeline.plant(slot_id, seed)?;

            events.push(SimEvent::SeedPlanted {
                tick: ctx.tick,
                slot_id,
                strain: strain.clone(),
            });
            world.activity.push(ActivityEntry {
                tick: ctx.tick,
                minutes: ctx.minutes,
                actor: name.to_string(),
                message: format!("{name} planted {strain} in slot {slot_id}"),
                grams: None,
                revenue: None,
            });
            worked = true;
        }

        for slot_id in world.pipeline.mature_slots() {
            let unit_id = world.next_id("unit");
            let seed_id = world.next_id("seed");
            let outcome = world
                .pipeline
                .harvest(slot_id, unit_id, seed_id, &self.config, rng)?;

            events.push(SimEvent::PlantHarvested {
                tick: ctx.tick,
                slot_id,
                strain: outcome.unit.strain_name.clone(),
                grams: outcome.unit.grams,
                quality: outcome.unit.quality,
                seed_drop: outcome.seed_drop.is_some(),
            });
            world.activity.push(ActivityEntry {
                tick: ctx.tick,
                minutes: ctx.minutes,
                actor: name.to_string(),
                message: format!(
                    "{name} harvested {:.1}g of {} from slot {slot_id}",
                    outcome.unit.grams, outcome.unit.strain_name
                ),
                grams: Some(outcome.unit.grams),
                revenue: None,
            });

            world.inventory.deposit_unit(outcome.unit);
            if let Some(seed) = outcome.seed_drop {
                world.inventory.add_seed(seed);
            }
            worked = true;
        }

        Ok(worked)
    }

    /// Collect overflowed stations, then feed idle stations raw input.
    /// Agents only collect at the overflow ceiling; the 100..ceiling
    /// band stays available for manual collection.
    fn run_processor(
        &self,
        ctx: &TickCtx,
        world: &mut WorldState,
        name: &str,
        events: &mut Vec<SimEvent>,
    ) -> SimResult<bool> {
        let mut worked = false;

        for station_id in world.pipeline.overflowed_stations() {
            let batch = world.pipeline.collect(station_id)?;
            events.push(SimEvent::BatchCollected {
                tick: ctx.tick,
                station_id,
                drug: batch.drug,
                grams: batch.grams,
                purity: batch.purity.unwrap_or(0.0),
            });
            world.activity.push(ActivityEntry {
                tick: ctx.tick,
                minutes: ctx.minutes,
                actor: name.to_string(),
                message: format!(
                    "{name} bagged {:.1}g of {} from station {station_id}",
                    batch.grams,
                    batch.drug.as_str()
                ),
                grams: Some(batch.grams),
                revenue: None,
            });
            world.inventory.deposit_unit(batch);
            worked = true;
        }

        for drug in Drug::ALL {
            while let Some(station_id) = world.pipeline.idle_station(drug) {
                let Some(input) = world.inventory.first_raw_unit(drug) else {
                    break;
                };
                let unit_id = input.id.clone();
                if world.pipeline.can_accept(station_id, input).is_err() {
                    break;
                }
                let input = world.inventory.take_unit(&unit_id)?;
                let grams_in = input.grams;
                world.pipeline.start_processing(station_id, input, &self.config)?;

                events.push(SimEvent::ProcessingStarted {
                    tick: ctx.tick,
                    station_id,
                    drug,
                    grams_in,
                });
                world.activity.push(ActivityEntry {
                    tick: ctx.tick,
                    minutes: ctx.minutes,
                    actor: name.to_string(),
                    message: format!(
                        "{name} loaded {grams_in:.1}g of raw {} into station {station_id}",
                        drug.as_str()
                    ),
                    grams: Some(grams_in),
                    revenue: None,
                });
                worked = true;
            }
        }

        Ok(worked)
    }

    /// Buy a wholesale batch when the local stash is empty, sized for
    /// whichever drug the likeliest buyer wants. Skipped quietly when
    /// cash is short or nobody is buying.
    fn import_stock(
        &self,
        ctx: &TickCtx,
        world: &mut WorldState,
        rng: &mut SubsystemRng,
        worker_id: &str,
        name: &str,
        events: &mut Vec<SimEvent>,
    ) -> SimResult<Option<(String, Drug, f64, f64)>> {
        let w = &self.config.workers;
        let cost = (w.import_batch_grams * w.import_cost_per_gram).ceil() as Cash;
        if world.cash() < cost {
            return Ok(None);
        }
        let Some(buyer) = world.customers.pick_buyer(rng) else {
            return Ok(None);
        };
        let drug = buyer.preferred_drug();

        world.debit(cost)?;
        let unit_id = world.next_id("unit");
        let unit = CommodityUnit {
            id: unit_id.clone(),
            strain_name: "Imported Cut".into(),
            drug,
            rarity: Rarity::Common,
            quality: w.import_quality,
            purity: None,
            purity_bonus: 0.0,
            grams: w.import_batch_grams,
            stage: BatchStage::Harvested,
        };
        let quality = unit.effective_quality();
        let grams = unit.grams;

        events.push(SimEvent::StockImported {
            tick: ctx.tick,
            worker_id: worker_id.to_string(),
            drug,
            grams,
            cost,
        });
        world.activity.push(ActivityEntry {
            tick: ctx.tick,
            minutes: ctx.minutes,
            actor: name.to_string(),
            message: format!(
                "{name} restocked {grams:.1}g of {} from the wholesaler for ${cost}",
                drug.as_str()
            ),
            grams: Some(grams),
            revenue: None,
        });
        world.inventory.deposit_unit(unit);
        Ok(Some((unit_id, drug, quality, grams)))
    }

    /// Sell up to the level-scaled quota: best unit to a weighted
    /// random buyer, at a level-boosted price. Falls back to a
    /// wholesale import when there is nothing on hand.
    fn run_dealer(
        &self,
        ctx: &TickCtx,
        world: &mut WorldState,
        rng: &mut SubsystemRng,
        worker_id: &str,
        name: &str,
        level: u32,
        events: &mut Vec<SimEvent>,
    ) -> SimResult<bool> {
        let w = &self.config.workers;
        let quota = w.dealer_base_quota + level / w.dealer_quota_per_level;
        let mut worked = false;

        for _ in 0..quota {
            let stash = world
                .inventory
                .best_unit_any()
                .map(|u| (u.id.clone(), u.drug, u.effective_quality(), u.grams));
            let (unit_id, drug, quality, available) = match stash {
                Some(info) => info,
                None => {
                    match self.import_stock(ctx, world, rng, worker_id, name, events)? {
                        Some(info) => {
                            worked = true;
                            info
                        }
                        None => break,
                    }
                }
            };

            let Some(buyer) = world.customers.pick_buyer(rng) else {
                break;
            };
            let buyer_id = buyer.id.clone();
            let buyer_name = buyer.name.clone();
            let relationship = buyer.relationship();

            let grams_max = w.dealer_grams_max_base + level as f64 * w.dealer_grams_max_per_level;
            let grams = rng.range_f64(w.dealer_grams_min, grams_max).min(available);
            let price_bonus = 1.0 + level as f64 * w.dealer_price_bonus_per_level;
            let revenue =
                pricing::sale_price(&self.config, drug, grams, quality, relationship, price_bonus);

            world.inventory.withdraw(&unit_id, grams)?;
            world.credit(revenue);
            let d = &self.config.demand;
            world.customers.record_sale(
                &buyer_id,
                drug,
                grams,
                ctx.minutes,
                d.loyalty_per_sale,
                d.satisfaction_per_sale,
                d.addiction_per_gram,
            )?;

            events.push(SimEvent::SaleCompleted {
                tick: ctx.tick,
                customer_id: buyer_id,
                drug,
                grams,
                revenue,
                seller: name.to_string(),
            });
            world.activity.push(ActivityEntry {
                tick: ctx.tick,
                minutes: ctx.minutes,
                actor: name.to_string(),
                message: format!(
                    "{name} {} — {grams:.1}g of {} to {buyer_name}",
                    NameGenerator::deal_line(rng),
                    drug.as_str()
                ),
                grams: Some(grams),
                revenue: Some(revenue),
            });
            worked = true;
        }

        Ok(worked)
    }
}

impl SimSubsystem for WorkerSubsystem {
    fn name(&self) -> &'static str {
        "worker"
    }

    fn update(
        &mut self,
        ctx: &TickCtx,
        world: &mut WorldState,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        let mut events = Vec::new();

        for worker_id in world.workers.active_ids() {
            let (role, level, name) = {
                let w = world.workers.get(&worker_id)?;
                (w.role, w.level, w.name.clone())
            };

            let worked = match role {
                WorkerRole::Grower => self.run_grower(ctx, world, rng, &name, &mut events)?,
                WorkerRole::Processor => self.run_processor(ctx, world, &name, &mut events)?,
                WorkerRole::Dealer => {
                    self.run_dealer(ctx, world, rng, &worker_id, &name, level, &mut events)?
                }
            };

            if !worked && rng.chance(self.config.workers.idle_log_chance) {
                events.push(SimEvent::WorkerIdled {
                    tick: ctx.tick,
                    worker_id: worker_id.clone(),
                });
                world.activity.push(ActivityEntry {
                    tick: ctx.tick,
                    minutes: ctx.minutes,
                    actor: name.clone(),
                    message: format!("{name} {}", NameGenerator::idle_line(rng)),
                    grams: None,
                    revenue: None,
                });
            }
        }

        Ok(events)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
