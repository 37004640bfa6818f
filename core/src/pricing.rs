//! The pricing engine — pure, deterministic sale math.
//!
//! Every sale path in the simulation (manual sells, request
//! fulfillment, dealer automation) routes through this module. No
//! randomness lives here: given identical inputs the result is
//! identical, so pricing is testable in isolation.
//!
//! price_per_gram = base_price(drug)
//!                × quality_mult(quality)
//!                × loyalty_mult(loyalty)
//!                × spending_mult(spending_power)
//!                × external_mult
//! then capped at the per-drug price ceiling, if any. Sale totals are
//! floored to integer cash.

use crate::{
    config::SimConfig,
    types::{Cash, Drug},
};

/// The buyer-relationship half of the price formula.
#[derive(Debug, Clone, Copy)]
pub struct Relationship {
    pub loyalty:        f64,
    pub spending_power: f64,
}

impl Relationship {
    /// A walk-in with no history. Both multipliers sit at their floor.
    pub const STRANGER: Relationship = Relationship {
        loyalty:        0.0,
        spending_power: 0.0,
    };
}

/// quality 0..100 → multiplier in [base, base + span].
pub fn quality_multiplier(cfg: &SimConfig, drug: Drug, quality: f64) -> f64 {
    let d = cfg.drug(drug);
    d.quality_mult_base + (quality.clamp(0.0, 100.0) / 100.0) * d.quality_mult_span
}

/// loyalty 0..100 → multiplier in [0.8, 1.3].
pub fn loyalty_multiplier(loyalty: f64) -> f64 {
    0.8 + (loyalty.clamp(0.0, 100.0) / 100.0) * 0.5
}

/// spending power 0..100 → multiplier in [0.8, 1.3].
pub fn spending_multiplier(spending_power: f64) -> f64 {
    0.8 + (spending_power.clamp(0.0, 100.0) / 100.0) * 0.5
}

/// Per-gram price after all multipliers and the ceiling cap.
pub fn price_per_gram(
    cfg: &SimConfig,
    drug: Drug,
    quality: f64,
    relationship: Relationship,
    external_mult: f64,
) -> f64 {
    let d = cfg.drug(drug);
    let raw = d.base_price
        * quality_multiplier(cfg, drug, quality)
        * loyalty_multiplier(relationship.loyalty)
        * spending_multiplier(relationship.spending_power)
        * external_mult;
    match d.price_ceiling {
        Some(cap) => raw.min(cap),
        None => raw,
    }
}

/// Total sale price, floored to whole cash. Never negative.
pub fn sale_price(
    cfg: &SimConfig,
    drug: Drug,
    grams: f64,
    quality: f64,
    relationship: Relationship,
    external_mult: f64,
) -> Cash {
    let total = price_per_gram(cfg, drug, quality, relationship, external_mult) * grams.max(0.0);
    total.floor().max(0.0) as Cash
}

/// Effective quality score of a commodity unit for pricing: refined
/// product is priced on the blend of quality and purity.
pub fn effective_quality(quality: f64, purity: Option<f64>) -> f64 {
    match purity {
        Some(p) => (quality + p) / 2.0,
        None => quality,
    }
}
