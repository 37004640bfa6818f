//! The simulation engine — tick orchestration, subsystem registry,
//! the append-only event log, and the synchronous command surface.
//!
//! Subsystem execution order is FIXED: pipeline, then workers, then
//! demand. Workers act on freshly advanced pipeline state; customers
//! react to what the workers left behind. Changing this order changes
//! simulation results, so it is part of the engine's contract.

use crate::{
    clock::SimClock,
    command::{CommandOutcome, PlayerCommand},
    config::SimConfig,
    demand_subsystem::DemandSubsystem,
    error::{SimError, SimResult},
    event::{ActivityEntry, EventLogEntry, SimEvent},
    genetics,
    name_generator::NameGenerator,
    pipeline_subsystem::PipelineSubsystem,
    pricing,
    rng::{RngBank, SubsystemRng, SubsystemSlot},
    store::{customer::CustomerStatus, worker::WorkerRole, WorldState},
    subsystem::{SimSubsystem, TickCtx},
    types::{Cash, Drug, Minutes, Tick},
    worker_subsystem::WorkerSubsystem,
};

/// Grams consumed by a free sample.
const SAMPLE_GRAMS: f64 = 1.0;

pub struct SimEngine {
    run_id:   String,
    seed:     u64,
    config:   SimConfig,
    clock:    SimClock,
    rng_bank: RngBank,
    world:    WorldState,
    subsystems: Vec<(SubsystemSlot, Box<dyn SimSubsystem>)>,
    event_log:  Vec<EventLogEntry>,
    /// Monotonic command counter salting per-command RNG streams.
    command_counter: u64,
}

impl SimEngine {
    pub fn new(run_id: String, seed: u64, config: SimConfig) -> SimResult<Self> {
        let subsystems: Vec<(SubsystemSlot, Box<dyn SimSubsystem>)> = vec![
            (
                SubsystemSlot::Pipeline,
                Box::new(PipelineSubsystem::new(config.clone())),
            ),
            (
                SubsystemSlot::Worker,
                Box::new(WorkerSubsystem::new(config.clone())),
            ),
            (
                SubsystemSlot::Demand,
                Box::new(DemandSubsystem::new(config.clone())),
            ),
        ];

        let world = WorldState::new(&config);
        let mut engine = Self {
            run_id: run_id.clone(),
            seed,
            clock: SimClock::new(run_id),
            rng_bank: RngBank::new(seed),
            config,
            world,
            subsystems,
            event_log: Vec::new(),
            command_counter: 0,
        };
        let init = SimEvent::RunInitialized {
            run_id: engine.run_id.clone(),
            seed,
        };
        Self::append(
            &mut engine.event_log,
            &engine.run_id,
            0,
            "engine",
            &[init],
        )?;
        log::info!("run {} initialized with seed {seed}", engine.run_id);
        Ok(engine)
    }

    fn append(
        log: &mut Vec<EventLogEntry>,
        run_id: &str,
        tick: Tick,
        subsystem: &str,
        events: &[SimEvent],
    ) -> SimResult<()> {
        for event in events {
            log.push(EventLogEntry {
                run_id: run_id.to_string(),
                tick,
                subsystem: subsystem.to_string(),
                event_type: event.type_name().to_string(),
                payload: serde_json::to_string(event)?,
            });
        }
        Ok(())
    }

    fn command_rng(&mut self, slot: SubsystemSlot) -> SubsystemRng {
        let counter = self.command_counter;
        self.command_counter += 1;
        self.rng_bank.for_command(slot, counter)
    }

    fn record(&mut self, events: &[SimEvent]) -> SimResult<()> {
        Self::append(
            &mut self.event_log,
            &self.run_id,
            self.clock.current_tick,
            "command",
            events,
        )
    }

    // ── Tick orchestration ────────────────────────────────────────

    /// Advance the whole simulation by one tick of `delta_minutes`.
    /// The clock must be running.
    pub fn tick(&mut self, delta_minutes: Minutes) -> SimResult<Tick> {
        let tick = self.clock.advance(delta_minutes);
        let ctx = TickCtx {
            tick,
            minutes: self.clock.minutes,
            delta_minutes,
        };

        Self::append(
            &mut self.event_log,
            &self.run_id,
            tick,
            "engine",
            &[SimEvent::TickStarted { tick }],
        )?;

        for (slot, subsystem) in &mut self.subsystems {
            let mut rng = self.rng_bank.for_subsystem_at_tick(*slot, tick);
            let events = subsystem.update(&ctx, &mut self.world, &mut rng)?;
            Self::append(
                &mut self.event_log,
                &self.run_id,
                tick,
                subsystem.name(),
                &events,
            )?;
        }

        Self::append(
            &mut self.event_log,
            &self.run_id,
            tick,
            "engine",
            &[SimEvent::TickCompleted { tick }],
        )?;
        Ok(tick)
    }

    /// Run `n` ticks of equal length, resuming and re-pausing the clock.
    pub fn run_ticks(&mut self, n: u64, delta_minutes: Minutes) -> SimResult<Tick> {
        self.clock.resume();
        let mut last = self.clock.current_tick;
        for _ in 0..n {
            last = self.tick(delta_minutes)?;
        }
        self.clock.pause();
        Ok(last)
    }

    // ── Accessors ─────────────────────────────────────────────────

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// Direct world access for tooling and test setup.
    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    pub fn event_log(&self) -> &[EventLogEntry] {
        &self.event_log
    }

    /// Decoded events for one tick, in emission order.
    pub fn events_for_tick(&self, tick: Tick) -> SimResult<Vec<SimEvent>> {
        self.event_log
            .iter()
            .filter(|e| e.tick == tick)
            .map(|e| Ok(serde_json::from_str(&e.payload)?))
            .collect()
    }

    // ── Commands ──────────────────────────────────────────────────

    pub fn execute(&mut self, command: PlayerCommand) -> SimResult<CommandOutcome> {
        match command {
            PlayerCommand::Plant { slot_id, seed_id } => self.plant(slot_id, &seed_id),
            PlayerCommand::Water { slot_id } => self.water(slot_id),
            PlayerCommand::Boost { slot_id, taps } => self.boost(slot_id, taps),
            PlayerCommand::Harvest { slot_id } => self.harvest(slot_id),
            PlayerCommand::StartProcessing {
                station_id,
                unit_id,
            } => self.start_processing(station_id, &unit_id),
            PlayerCommand::Collect { station_id } => self.collect(station_id),
            PlayerCommand::UnlockSlot => self.unlock_slot(),
            PlayerCommand::Sell {
                customer_id,
                unit_id,
                grams,
            } => self.sell(&customer_id, &unit_id, grams),
            PlayerCommand::GiveSample {
                customer_id,
                unit_id,
            } => self.give_sample(&customer_id, &unit_id),
            PlayerCommand::FulfillRequest { customer_id } => self.fulfill_request(&customer_id),
            PlayerCommand::IgnoreRequest { customer_id } => self.ignore_request(&customer_id),
            PlayerCommand::OfferDrug { customer_id, drug } => self.offer_drug(&customer_id, drug),
            PlayerCommand::HireWorker { role } => self.hire_worker(role),
            PlayerCommand::ToggleWorkerPause { worker_id } => {
                self.toggle_worker_pause(&worker_id)
            }
            PlayerCommand::Breed { seed_a, seed_b } => self.breed(&seed_a, &seed_b),
        }
    }

    pub fn plant(&mut self, slot_id: usize, seed_id: &str) -> SimResult<CommandOutcome> {
        // Validate the slot before consuming the seed, so a rejected
        // plant never costs the player their seed.
        {
            let slot = self.world.pipeline.slot(slot_id)?;
            if !slot.unlocked {
                return Err(SimError::invalid_state(format!("slot {slot_id} is locked")));
            }
            if slot.occupant.is_some() {
                return Err(SimError::invalid_state(format!(
                    "slot {slot_id} is already occupied"
                )));
            }
        }
        let seed = self.world.inventory.take_seed(seed_id)?;
        let strain = seed.strain_name.clone();
        self.world.pipeline.plant(slot_id, seed)?;

        let tick = self.clock.current_tick;
        self.record(&[SimEvent::SeedPlanted {
            tick,
            slot_id,
            strain: strain.clone(),
        }])?;
        Ok(CommandOutcome::Planted { slot_id, strain })
    }

    pub fn water(&mut self, slot_id: usize) -> SimResult<CommandOutcome> {
        self.world.pipeline.water(slot_id)?;
        Ok(CommandOutcome::Watered { slot_id })
    }

    pub fn boost(&mut self, slot_id: usize, taps: u32) -> SimResult<CommandOutcome> {
        let progress = self.world.pipeline.boost(slot_id, taps, &self.config.growth)?;
        Ok(CommandOutcome::Boosted { slot_id, progress })
    }

    pub fn harvest(&mut self, slot_id: usize) -> SimResult<CommandOutcome> {
        let mut rng = self.command_rng(SubsystemSlot::Pipeline);
        let unit_id = self.world.next_id("unit");
        let seed_id = self.world.next_id("seed");
        let outcome = self
            .world
            .pipeline
            .harvest(slot_id, unit_id, seed_id, &self.config, &mut rng)?;

        let tick = self.clock.current_tick;
        self.record(&[SimEvent::PlantHarvested {
            tick,
            slot_id,
            strain: outcome.unit.strain_name.clone(),
            grams: outcome.unit.grams,
            quality: outcome.unit.quality,
            seed_drop: outcome.seed_drop.is_some(),
        }])?;
        self.world.activity.push(ActivityEntry {
            tick,
            minutes: self.clock.minutes,
            actor: "you".into(),
            message: format!(
                "harvested {:.1}g of {} from slot {slot_id}",
                outcome.unit.grams, outcome.unit.strain_name
            ),
            grams: Some(outcome.unit.grams),
            revenue: None,
        });

        let result = CommandOutcome::Harvested {
            unit_id: outcome.unit.id.clone(),
            grams: outcome.unit.grams,
            quality: outcome.unit.quality,
            seed_drop: outcome.seed_drop.is_some(),
        };
        self.world.inventory.deposit_unit(outcome.unit);
        if let Some(seed) = outcome.seed_drop {
            self.world.inventory.add_seed(seed);
        }
        Ok(result)
    }

    pub fn start_processing(
        &mut self,
        station_id: usize,
        unit_id: &str,
    ) -> SimResult<CommandOutcome> {
        // can_accept first: a rejected start must leave the input unit
        // in inventory untouched.
        {
            let input = self.world.inventory.unit(unit_id)?;
            self.world.pipeline.can_accept(station_id, input)?;
        }
        let input = self.world.inventory.take_unit(unit_id)?;
        let grams_in = input.grams;
        let drug = input.drug;
        self.world
            .pipeline
            .start_processing(station_id, input, &self.config)?;

        let tick = self.clock.current_tick;
        self.record(&[SimEvent::ProcessingStarted {
            tick,
            station_id,
            drug,
            grams_in,
        }])?;
        Ok(CommandOutcome::ProcessingStarted {
            station_id,
            grams_in,
        })
    }

    pub fn collect(&mut self, station_id: usize) -> SimResult<CommandOutcome> {
        let batch = self.world.pipeline.collect(station_id)?;
        let tick = self.clock.current_tick;
        self.record(&[SimEvent::BatchCollected {
            tick,
            station_id,
            drug: batch.drug,
            grams: batch.grams,
            purity: batch.purity.unwrap_or(0.0),
        }])?;

        let result = CommandOutcome::Collected {
            unit_id: batch.id.clone(),
            grams: batch.grams,
            purity: batch.purity.unwrap_or(0.0),
        };
        self.world.inventory.deposit_unit(batch);
        Ok(result)
    }

    pub fn unlock_slot(&mut self) -> SimResult<CommandOutcome> {
        if self.world.pipeline.slots().iter().all(|s| s.unlocked) {
            return Err(SimError::invalid_state("all slots are unlocked"));
        }
        let cost = self.config.growth.slot_unlock_cost;
        self.world.debit(cost)?;
        let slot_id = self.world.pipeline.unlock_next_slot()?;

        let tick = self.clock.current_tick;
        self.record(&[SimEvent::SlotUnlocked {
            tick,
            slot_id,
            cost,
        }])?;
        Ok(CommandOutcome::SlotUnlocked { slot_id, cost })
    }

    pub fn sell(
        &mut self,
        customer_id: &str,
        unit_id: &str,
        grams: f64,
    ) -> SimResult<CommandOutcome> {
        let (relationship, drug, quality) = {
            let c = self.world.customers.get(customer_id)?;
            if c.status == CustomerStatus::Prospect {
                return Err(SimError::ineligible(format!(
                    "{} is still a prospect — give them a sample first",
                    c.name
                )));
            }
            if c.blocked {
                return Err(SimError::ineligible(format!("{} wants nothing from you", c.name)));
            }
            let unit = self.world.inventory.unit(unit_id)?;
            (c.relationship(), unit.drug, unit.effective_quality())
        };

        let revenue = pricing::sale_price(&self.config, drug, grams, quality, relationship, 1.0);
        self.world.inventory.withdraw(unit_id, grams)?;
        self.world.credit(revenue);
        let d = &self.config.demand;
        self.world.customers.record_sale(
            customer_id,
            drug,
            grams,
            self.clock.minutes,
            d.loyalty_per_sale,
            d.satisfaction_per_sale,
            d.addiction_per_gram,
        )?;

        let tick = self.clock.current_tick;
        self.record(&[SimEvent::SaleCompleted {
            tick,
            customer_id: customer_id.to_string(),
            drug,
            grams,
            revenue,
            seller: "you".into(),
        }])?;
        self.world.activity.push(ActivityEntry {
            tick,
            minutes: self.clock.minutes,
            actor: "you".into(),
            message: format!("sold {grams:.1}g of {} for ${revenue}", drug.as_str()),
            grams: Some(grams),
            revenue: Some(revenue),
        });
        Ok(CommandOutcome::Sold { revenue })
    }

    pub fn give_sample(&mut self, customer_id: &str, unit_id: &str) -> SimResult<CommandOutcome> {
        let (drug, quality) = {
            let c = self.world.customers.get(customer_id)?;
            if c.status != CustomerStatus::Prospect {
                return Err(SimError::ineligible(format!("{} is already a customer", c.name)));
            }
            let unit = self.world.inventory.unit(unit_id)?;
            (unit.drug, unit.effective_quality())
        };
        self.world.inventory.withdraw(unit_id, SAMPLE_GRAMS)?;

        let mut rng = self.command_rng(SubsystemSlot::Demand);
        let d = &self.config.demand;
        let p = d.sample_conversion_base + (quality / 100.0) * d.sample_conversion_span;
        let converted = rng.chance(p);

        if converted {
            let gap = d.request_cooldown_minutes + rng.range_f64(0.0, d.request_spread_minutes);
            let (conversion_loyalty, seeded_addiction) = (d.conversion_loyalty, d.seeded_addiction);
            let minutes = self.clock.minutes;
            let c = self.world.customers.get_mut(customer_id)?;
            c.convert(conversion_loyalty);
            c.preferences.insert(drug);
            c.bump_addiction(drug, seeded_addiction);
            c.next_request_at_minutes = minutes + gap;
        }

        let tick = self.clock.current_tick;
        self.record(&[SimEvent::SampleGiven {
            tick,
            customer_id: customer_id.to_string(),
            drug,
            quality,
            converted,
        }])?;
        Ok(CommandOutcome::SampleResult { converted })
    }

    pub fn fulfill_request(&mut self, customer_id: &str) -> SimResult<CommandOutcome> {
        let request = self
            .world
            .customers
            .get(customer_id)?
            .pending_request
            .clone()
            .ok_or_else(|| {
                SimError::invalid_state(format!("customer {customer_id} has no pending request"))
            })?;

        let unit_id = self
            .world
            .inventory
            .best_unit(request.drug, Some(request.grams))
            .map(|u| u.id.clone())
            .ok_or_else(|| SimError::InsufficientResource {
                resource: "grams",
                needed: request.grams,
                available: self.world.inventory.total_grams(request.drug),
            })?;

        let revenue = request.max_price;
        self.world.inventory.withdraw(&unit_id, request.grams)?;
        self.world.credit(revenue);

        let mut rng = self.command_rng(SubsystemSlot::Demand);
        let d = &self.config.demand;
        let gap = d.request_cooldown_minutes + rng.range_f64(0.0, d.request_spread_minutes);
        let minutes = self.clock.minutes;
        {
            let c = self.world.customers.get_mut(customer_id)?;
            c.pending_request = None;
            c.next_request_at_minutes = minutes + gap;
        }
        self.world.customers.record_sale(
            customer_id,
            request.drug,
            request.grams,
            minutes,
            d.loyalty_per_sale,
            d.satisfaction_per_sale,
            d.addiction_per_gram,
        )?;

        let tick = self.clock.current_tick;
        self.record(&[
            SimEvent::RequestFulfilled {
                tick,
                customer_id: customer_id.to_string(),
                request_id: request.id.clone(),
                drug: request.drug,
                grams: request.grams,
                revenue,
            },
            SimEvent::SaleCompleted {
                tick,
                customer_id: customer_id.to_string(),
                drug: request.drug,
                grams: request.grams,
                revenue,
                seller: "you".into(),
            },
        ])?;
        self.world.activity.push(ActivityEntry {
            tick,
            minutes,
            actor: "you".into(),
            message: format!(
                "filled a request: {:.1}g of {} for ${revenue}",
                request.grams,
                request.drug.as_str()
            ),
            grams: Some(request.grams),
            revenue: Some(revenue),
        });
        Ok(CommandOutcome::RequestFulfilled { revenue })
    }

    pub fn ignore_request(&mut self, customer_id: &str) -> SimResult<CommandOutcome> {
        let spontaneous = self
            .world
            .customers
            .get(customer_id)?
            .pending_request
            .as_ref()
            .map(|r| r.spontaneous)
            .ok_or_else(|| {
                SimError::invalid_state(format!("customer {customer_id} has no pending request"))
            })?;
        if !spontaneous {
            return Err(SimError::ineligible(
                "scheduled requests expire on their own",
            ));
        }

        let mut rng = self.command_rng(SubsystemSlot::Demand);
        let d = &self.config.demand;
        let gap = d.request_cooldown_minutes + rng.range_f64(0.0, d.request_spread_minutes);
        let minutes = self.clock.minutes;
        let c = self.world.customers.get_mut(customer_id)?;
        let request = c.pending_request.take().expect("checked above");
        c.next_request_at_minutes = minutes + gap;

        let tick = self.clock.current_tick;
        self.record(&[SimEvent::RequestIgnored {
            tick,
            customer_id: customer_id.to_string(),
            request_id: request.id,
        }])?;
        Ok(CommandOutcome::RequestIgnored)
    }

    pub fn offer_drug(&mut self, customer_id: &str, drug: Drug) -> SimResult<CommandOutcome> {
        use crate::store::customer::Personality;

        let personality = {
            let c = self.world.customers.get(customer_id)?;
            if c.status == CustomerStatus::Prospect {
                return Err(SimError::ineligible(format!(
                    "{} is still a prospect",
                    c.name
                )));
            }
            if c.blocked {
                return Err(SimError::ineligible(format!("{} wants nothing from you", c.name)));
            }
            if c.preferences.contains(&drug) {
                return Err(SimError::ineligible(format!(
                    "{} already buys {}",
                    c.name,
                    drug.as_str()
                )));
            }
            c.personality
        };

        let adventurous_accept = self.config.demand.adventurous_accept_chance;
        let seeded_addiction = self.config.demand.seeded_addiction;
        let rejection_penalty = self.config.demand.offer_rejection_penalty;

        let accepted = match personality {
            Personality::Hardcore => true,
            Personality::Adventurous => {
                let mut rng = self.command_rng(SubsystemSlot::Demand);
                rng.chance(adventurous_accept)
            }
            Personality::Paranoid | Personality::Casual => false,
        };

        let tick = self.clock.current_tick;

        if accepted {
            let c = self.world.customers.get_mut(customer_id)?;
            c.preferences.insert(drug);
            c.bump_addiction(drug, seeded_addiction);
            self.record(&[SimEvent::OfferAccepted {
                tick,
                customer_id: customer_id.to_string(),
                drug,
            }])?;
            return Ok(CommandOutcome::OfferResult {
                accepted: true,
                blocked: false,
            });
        }

        let blocked = personality == Personality::Paranoid;
        {
            let c = self.world.customers.get_mut(customer_id)?;
            if blocked {
                // The block takes effect at the top of the next demand
                // pass, when the ledger sweeps flagged customers.
                c.blocked = true;
            } else {
                c.bump_loyalty(-rejection_penalty);
            }
        }
        self.record(&[SimEvent::OfferRejected {
            tick,
            customer_id: customer_id.to_string(),
            drug,
            blocked,
        }])?;
        Ok(CommandOutcome::OfferResult {
            accepted: false,
            blocked,
        })
    }

    pub fn hire_worker(&mut self, role: WorkerRole) -> SimResult<CommandOutcome> {
        let w = &self.config.workers;
        let cost: Cash = match role {
            WorkerRole::Grower => w.hire_cost_grower,
            WorkerRole::Processor => w.hire_cost_processor,
            WorkerRole::Dealer => w.hire_cost_dealer,
        };
        self.world.debit(cost)?;

        let mut rng = self.command_rng(SubsystemSlot::Flavor);
        let worker_id = self.world.next_id("worker");
        let name = NameGenerator::worker_name(&mut rng);
        self.world.workers.hire(worker_id.clone(), name.clone(), role);

        let tick = self.clock.current_tick;
        self.record(&[SimEvent::WorkerHired {
            tick,
            worker_id: worker_id.clone(),
            role: role.as_str().to_string(),
            cost,
        }])?;
        self.world.activity.push(ActivityEntry {
            tick,
            minutes: self.clock.minutes,
            actor: "you".into(),
            message: format!("hired {name} as a {}", role.as_str()),
            grams: None,
            revenue: Some(-cost),
        });
        Ok(CommandOutcome::WorkerHired { worker_id, name })
    }

    pub fn toggle_worker_pause(&mut self, worker_id: &str) -> SimResult<CommandOutcome> {
        let paused = self.world.workers.toggle_pause(worker_id)?;
        let tick = self.clock.current_tick;
        self.record(&[SimEvent::WorkerPauseToggled {
            tick,
            worker_id: worker_id.to_string(),
            paused,
        }])?;
        Ok(CommandOutcome::WorkerPause { paused })
    }

    pub fn breed(&mut self, seed_a: &str, seed_b: &str) -> SimResult<CommandOutcome> {
        if seed_a == seed_b {
            return Err(SimError::ineligible("cannot breed a seed with itself"));
        }
        // Validate before consuming: a rejected cross costs nothing.
        let (parent_a, parent_b) = {
            let a = self.world.inventory.seed(seed_a)?.clone();
            let b = self.world.inventory.seed(seed_b)?.clone();
            if a.drug != b.drug {
                return Err(SimError::ineligible(format!(
                    "cannot cross a {} strain with a {} strain",
                    a.drug.as_str(),
                    b.drug.as_str()
                )));
            }
            (a, b)
        };

        let mut rng = self.command_rng(SubsystemSlot::Breeding);
        let generation = parent_a.generation.max(parent_b.generation) + 1;
        let offspring_name = NameGenerator::strain_name(&mut rng, generation);
        let offspring_id = self.world.next_id("seed");
        let result = genetics::breed(
            &self.config.breeding,
            &parent_a,
            &parent_b,
            offspring_id.clone(),
            offspring_name.clone(),
            &mut rng,
        )?;

        // Both parents are consumed, Fail outcomes included.
        self.world.inventory.take_seed(seed_a)?;
        self.world.inventory.take_seed(seed_b)?;

        let tick = self.clock.current_tick;
        self.record(&[SimEvent::BreedingCompleted {
            tick,
            offspring_id: offspring_id.clone(),
            strain: offspring_name.clone(),
            outcome: result.outcome,
            rarity: result.offspring.rarity,
            generation: result.offspring.generation,
        }])?;
        self.world.activity.push(ActivityEntry {
            tick,
            minutes: self.clock.minutes,
            actor: "you".into(),
            message: format!(
                "bred {} x {} into {} ({})",
                parent_a.strain_name,
                parent_b.strain_name,
                offspring_name,
                result.outcome.as_str()
            ),
            grams: None,
            revenue: None,
        });

        let outcome = CommandOutcome::Bred {
            offspring_id,
            strain: offspring_name,
            outcome: result.outcome,
            rarity: result.offspring.rarity,
            generation: result.offspring.generation,
        };
        self.world.inventory.add_seed(result.offspring);
        Ok(outcome)
    }
}
