//! Demand subsystem — the customer ledger's per-tick pass.
//!
//! Pass order inside one tick is fixed:
//!   1. remove flagged customers (blocked or churned)
//!   2. expire overdue requests (penalties for scheduled ones)
//!   3. issue scheduled requests
//!   4. roll spontaneous requests (suppressed while one is pending)
//!   5. roll walk-in prospects
//!
//! Removal runs first so a customer blocked by an offer during the
//! previous tick disappears at the top of this pass, before any new
//! request could be issued for them.

use crate::{
    config::SimConfig,
    error::SimResult,
    event::{ActivityEntry, SimEvent},
    name_generator::NameGenerator,
    pricing,
    rng::SubsystemRng,
    store::{
        customer::{Customer, CustomerStatus, Personality, PurchaseRequest},
        WorldState,
    },
    subsystem::{SimSubsystem, TickCtx},
    types::{Drug, Minutes},
};

/// Quality a customer assumes when budgeting a request. Requests are
/// priced before the product is chosen, so the max price is computed
/// against a decent-product expectation rather than live inventory.
const REQUEST_REFERENCE_QUALITY: f64 = 70.0;

const PERSONALITY_WEIGHTS: [(Personality, f64); 4] = [
    (Personality::Paranoid, 0.15),
    (Personality::Hardcore, 0.20),
    (Personality::Adventurous, 0.25),
    (Personality::Casual, 0.40),
];

const BASE_DRUG_WEIGHTS: [(Drug, f64); 3] = [
    (Drug::Weed, 0.60),
    (Drug::Koks, 0.25),
    (Drug::Meth, 0.15),
];

pub struct DemandSubsystem {
    config: SimConfig,
    seeded: bool,
}

impl DemandSubsystem {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            seeded: false,
        }
    }

    fn next_request_gap(&self, rng: &mut SubsystemRng) -> Minutes {
        let d = &self.config.demand;
        d.request_cooldown_minutes + rng.range_f64(0.0, d.request_spread_minutes)
    }

    fn spawn_prospect(
        &self,
        ctx: &TickCtx,
        world: &mut WorldState,
        rng: &mut SubsystemRng,
        events: &mut Vec<SimEvent>,
    ) {
        let id = world.next_id("cust");
        let name = NameGenerator::customer_name(rng);

        let weights: Vec<f64> = PERSONALITY_WEIGHTS.iter().map(|(_, w)| *w).collect();
        let personality = PERSONALITY_WEIGHTS[rng.weighted_index(&weights)].0;
        let weights: Vec<f64> = BASE_DRUG_WEIGHTS.iter().map(|(_, w)| *w).collect();
        let base_drug = BASE_DRUG_WEIGHTS[rng.weighted_index(&weights)].0;
        let spending_power = rng.range_f64(20.0, 90.0);
        let first_request_at = ctx.minutes + self.next_request_gap(rng);

        events.push(SimEvent::ProspectAcquired {
            tick: ctx.tick,
            customer_id: id.clone(),
            name: name.clone(),
        });
        world.activity.push(ActivityEntry {
            tick: ctx.tick,
            minutes: ctx.minutes,
            actor: name.clone(),
            message: format!("{name} showed up asking around"),
            grams: None,
            revenue: None,
        });

        world.customers.add(Customer::prospect(
            id,
            name,
            base_drug,
            personality,
            spending_power,
            first_request_at,
        ));
    }

    /// Build a request for `customer_id` and attach it. The max price
    /// runs through the pricing engine with the urgency multiplier.
    fn issue_request(
        &self,
        ctx: &TickCtx,
        world: &mut WorldState,
        rng: &mut SubsystemRng,
        customer_id: &str,
        spontaneous: bool,
        events: &mut Vec<SimEvent>,
    ) -> SimResult<()> {
        let (drug, urgency, relationship, name) = {
            let c = world.customers.get(customer_id)?;
            let drug = c.preferred_drug();
            (drug, c.urgency_for(drug), c.relationship(), c.name.clone())
        };
        let ucfg = self.config.urgency(urgency);
        let grams = rng.range_f64(ucfg.grams_min, ucfg.grams_max);
        let max_price = pricing::sale_price(
            &self.config,
            drug,
            grams,
            REQUEST_REFERENCE_QUALITY,
            relationship,
            ucfg.price_mult,
        );
        let request_id = world.next_id("req");
        let expires_at_minutes = ctx.minutes + ucfg.expiry_minutes;

        events.push(SimEvent::RequestIssued {
            tick: ctx.tick,
            customer_id: customer_id.to_string(),
            request_id: request_id.clone(),
            drug,
            grams,
            urgency,
            max_price,
            expires_at_minutes,
            spontaneous,
        });
        world.activity.push(ActivityEntry {
            tick: ctx.tick,
            minutes: ctx.minutes,
            actor: name.clone(),
            message: format!(
                "{name} wants {grams:.1}g of {} ({})",
                drug.as_str(),
                urgency.as_str()
            ),
            grams: Some(grams),
            revenue: None,
        });

        let c = world.customers.get_mut(customer_id)?;
        c.pending_request = Some(PurchaseRequest {
            id: request_id,
            drug,
            grams,
            max_price,
            expires_at_minutes,
            urgency,
            spontaneous,
        });
        Ok(())
    }
}

impl SimSubsystem for DemandSubsystem {
    fn name(&self) -> &'static str {
        "demand"
    }

    fn update(
        &mut self,
        ctx: &TickCtx,
        world: &mut WorldState,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        let mut events = Vec::new();

        if !self.seeded {
            self.seeded = true;
            for _ in 0..self.config.demand.initial_prospects {
                self.spawn_prospect(ctx, world, rng, &mut events);
            }
        }

        if ctx.tick % self.config.demand_pass_interval != 0 {
            return Ok(events);
        }

        // 1. Removal of flagged customers.
        let threshold = self.config.demand.churn_satisfaction_threshold;
        for (customer_id, reason) in world.customers.flagged_for_removal(threshold) {
            let gone = world.customers.remove(&customer_id)?;
            log::info!("tick={} demand: {} churned ({reason})", ctx.tick, gone.name);
            events.push(SimEvent::CustomerChurned {
                tick: ctx.tick,
                customer_id,
                reason,
            });
            world.activity.push(ActivityEntry {
                tick: ctx.tick,
                minutes: ctx.minutes,
                actor: gone.name.clone(),
                message: format!("{} won't be coming back", gone.name),
                grams: None,
                revenue: None,
            });
        }

        // 2. Expiry of overdue requests.
        let overdue: Vec<String> = world
            .customers
            .iter()
            .filter(|c| {
                c.pending_request
                    .as_ref()
                    .is_some_and(|r| ctx.minutes >= r.expires_at_minutes)
            })
            .map(|c| c.id.clone())
            .collect();
        for customer_id in overdue {
            let gap = self.next_request_gap(rng);
            let c = world.customers.get_mut(&customer_id)?;
            let request = c.pending_request.take().expect("filtered on pending");
            c.next_request_at_minutes = ctx.minutes + gap;

            // Spontaneous requests lapse without consequence.
            if request.spontaneous {
                continue;
            }

            let ucfg = self.config.urgency(request.urgency);
            let (loyalty_penalty, satisfaction_penalty) =
                (ucfg.loyalty_penalty, ucfg.satisfaction_penalty);
            c.bump_loyalty(-loyalty_penalty);
            c.bump_satisfaction(-satisfaction_penalty);
            let name = c.name.clone();

            events.push(SimEvent::RequestExpired {
                tick: ctx.tick,
                customer_id,
                request_id: request.id,
                urgency: request.urgency,
                loyalty_penalty,
            });
            world.activity.push(ActivityEntry {
                tick: ctx.tick,
                minutes: ctx.minutes,
                actor: name.clone(),
                message: format!("{name} waited too long and walked away"),
                grams: None,
                revenue: None,
            });
        }

        // 3. Scheduled requests.
        let due: Vec<String> = world
            .customers
            .iter()
            .filter(|c| {
                c.status != CustomerStatus::Prospect
                    && !c.blocked
                    && c.pending_request.is_none()
                    && ctx.minutes >= c.next_request_at_minutes
            })
            .map(|c| c.id.clone())
            .collect();
        for customer_id in due {
            self.issue_request(ctx, world, rng, &customer_id, false, &mut events)?;
        }

        // 4. Spontaneous requests. A pending request of either kind
        // suppresses the roll, so scheduled demand always wins.
        let d = &self.config.demand;
        let candidates: Vec<(String, f64)> = world
            .customers
            .iter()
            .filter(|c| {
                c.status != CustomerStatus::Prospect && !c.blocked && c.pending_request.is_none()
            })
            .map(|c| (c.id.clone(), c.addiction(c.preferred_drug())))
            .collect();
        for (customer_id, addiction) in candidates {
            let per_minute = d.spontaneous_rate_max * (addiction / 100.0);
            let p = (per_minute * ctx.delta_minutes).min(0.5);
            if rng.chance(p) {
                self.issue_request(ctx, world, rng, &customer_id, true, &mut events)?;
            }
        }

        // 5. Walk-in prospects.
        let p = (self.config.demand.prospect_walk_in_rate * ctx.delta_minutes).min(0.5);
        if rng.chance(p) {
            self.spawn_prospect(ctx, world, rng, &mut events);
        }

        Ok(events)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
