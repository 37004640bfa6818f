//! Strain genetics and the breeding generator.
//!
//! A `GeneticEntity` is immutable once created. Planting consumes it;
//! breeding consumes both parents — Fail outcomes included — and
//! always yields exactly one offspring.

use crate::{
    config::BreedingConfig,
    error::{SimError, SimResult},
    rng::SubsystemRng,
    types::{Drug, Minutes},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Rarity ladder. Order matters: promotion walks up this list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn promote(&self, steps: usize) -> Rarity {
        let i = (self.index() + steps).min(Self::ALL.len() - 1);
        Self::ALL[i]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

/// Heritable strain traits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StrainTrait {
    FastGrowth,
    HighYield,
    Potent,
    Resilient,
    DenseBuds,
    Aromatic,
    FrostResistant,
    Sticky,
}

impl StrainTrait {
    pub const ALL: [StrainTrait; 8] = [
        StrainTrait::FastGrowth,
        StrainTrait::HighYield,
        StrainTrait::Potent,
        StrainTrait::Resilient,
        StrainTrait::DenseBuds,
        StrainTrait::Aromatic,
        StrainTrait::FrostResistant,
        StrainTrait::Sticky,
    ];
}

/// Discrete quality bucket of a breeding result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTier {
    Fail,
    Poor,
    Normal,
    Good,
    Excellent,
    Godtier,
}

impl OutcomeTier {
    pub const ALL: [OutcomeTier; 6] = [
        OutcomeTier::Fail,
        OutcomeTier::Poor,
        OutcomeTier::Normal,
        OutcomeTier::Good,
        OutcomeTier::Excellent,
        OutcomeTier::Godtier,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Poor => "poor",
            Self::Normal => "normal",
            Self::Good => "good",
            Self::Excellent => "excellent",
            Self::Godtier => "godtier",
        }
    }
}

/// A seed. Immutable; consumed by planting or breeding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticEntity {
    pub id:           String,
    pub strain_name:  String,
    /// The drug line this strain belongs to. Harvests yield raw
    /// product of this drug; breeding only crosses within a line.
    pub drug:         Drug,
    pub rarity:       Rarity,
    pub traits:       BTreeSet<StrainTrait>,
    /// Grams harvested at yield multiplier 1.0 before jitter.
    pub base_yield:   f64,
    /// Growth-rate multiplier, ~1.0 for a plain strain.
    pub growth_speed: f64,
    /// Purity carried into refined product from this lineage.
    pub purity_bonus: f64,
    pub generation:   u32,
    /// Parent strain names, recorded for lineage display.
    pub parents:      Option<(String, String)>,
}

impl GeneticEntity {
    /// A plain starter seed. Used for the initial stock and seed drops.
    pub fn starter(id: String, strain_name: String, drug: Drug, rarity: Rarity) -> Self {
        Self {
            id,
            strain_name,
            drug,
            rarity,
            traits: BTreeSet::new(),
            base_yield: 20.0 + rarity.index() as f64 * 6.0,
            growth_speed: 1.0,
            purity_bonus: 0.0,
            generation: 0,
            parents: None,
        }
    }

    /// Effective grow-speed multiplier including traits.
    pub fn speed_multiplier(&self) -> f64 {
        let mut m = self.growth_speed;
        if self.traits.contains(&StrainTrait::FastGrowth) {
            m *= 1.25;
        }
        if self.traits.contains(&StrainTrait::Resilient) {
            m *= 1.05;
        }
        m
    }

    /// Effective yield multiplier including traits.
    pub fn yield_multiplier(&self) -> f64 {
        let mut m = 1.0;
        if self.traits.contains(&StrainTrait::HighYield) {
            m *= 1.3;
        }
        if self.traits.contains(&StrainTrait::DenseBuds) {
            m *= 1.12;
        }
        m
    }

    /// Quality bonus granted at harvest by potency traits.
    pub fn quality_bonus(&self) -> f64 {
        let mut q = 0.0;
        if self.traits.contains(&StrainTrait::Potent) {
            q += 6.0;
        }
        if self.traits.contains(&StrainTrait::Sticky) {
            q += 3.0;
        }
        q
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreedResult {
    pub outcome:   OutcomeTier,
    pub offspring: GeneticEntity,
}

/// Weighted outcome-tier selection. Weights shift favorably with
/// parent rarity and generation; exposed for the distribution tests.
pub fn outcome_weights(
    cfg: &BreedingConfig,
    a: &GeneticEntity,
    b: &GeneticEntity,
) -> [f64; 6] {
    let mut w = cfg.outcome_weights;
    let rarity_score = (a.rarity.index() + b.rarity.index()) as f64;
    let gen_score = a.generation.max(b.generation) as f64;
    let shift = rarity_score * cfg.rarity_weight_shift + gen_score * cfg.generation_weight_shift;

    // Move mass out of Fail/Poor into Good/Excellent/Godtier. The low
    // tiers keep a floor so even legendary crosses can fail.
    w[0] = (w[0] - shift * 0.5).max(2.0);
    w[1] = (w[1] - shift * 0.5).max(3.0);
    w[3] += shift * 0.4;
    w[4] += shift * 0.4;
    w[5] += shift * 0.2;
    w
}

fn derive_rarity(outcome: OutcomeTier, a: Rarity, b: Rarity) -> Rarity {
    let base = a.max(b);
    match outcome {
        OutcomeTier::Fail => a.min(b),
        OutcomeTier::Poor | OutcomeTier::Normal => base,
        OutcomeTier::Good => base,
        OutcomeTier::Excellent => base.promote(1),
        OutcomeTier::Godtier => base.promote(2),
    }
}

/// Combine two parents into one offspring.
///
/// Rejects breeding a seed with itself. The caller owns inventory
/// removal of both parents — `breed` itself is pure apart from RNG.
pub fn breed(
    cfg: &BreedingConfig,
    parent_a: &GeneticEntity,
    parent_b: &GeneticEntity,
    offspring_id: String,
    offspring_name: String,
    rng: &mut SubsystemRng,
) -> SimResult<BreedResult> {
    if parent_a.id == parent_b.id {
        return Err(SimError::ineligible("cannot breed a seed with itself"));
    }
    if parent_a.drug != parent_b.drug {
        return Err(SimError::ineligible(format!(
            "cannot cross a {} strain with a {} strain",
            parent_a.drug.as_str(),
            parent_b.drug.as_str()
        )));
    }

    let weights = outcome_weights(cfg, parent_a, parent_b);
    let outcome = OutcomeTier::ALL[rng.weighted_index(&weights)];
    let tier = outcome.index();

    let rarity = derive_rarity(outcome, parent_a.rarity, parent_b.rarity);

    // Union of parent traits, each inherited independently.
    let mut traits = BTreeSet::new();
    for t in parent_a.traits.union(&parent_b.traits) {
        if rng.chance(cfg.trait_inherit_chance) {
            traits.insert(*t);
        }
    }
    // Outcome tier can add one novel trait not present in either parent.
    if rng.chance(cfg.novel_trait_chance[tier]) {
        let pool: Vec<StrainTrait> = StrainTrait::ALL
            .iter()
            .filter(|t| !traits.contains(t))
            .copied()
            .collect();
        if !pool.is_empty() {
            let pick = rng.next_u64_below(pool.len() as u64) as usize;
            traits.insert(pool[pick]);
        }
    }

    let parent_avg_yield = (parent_a.base_yield + parent_b.base_yield) / 2.0;
    let parent_avg_speed = (parent_a.growth_speed + parent_b.growth_speed) / 2.0;
    let base_yield = (parent_avg_yield * cfg.yield_factor[tier]).max(1.0);
    let growth_speed =
        (parent_avg_speed * (1.0 + (cfg.yield_factor[tier] - 1.0) * 0.3)).clamp(0.5, 2.5);
    let purity_bonus =
        parent_a.purity_bonus.max(parent_b.purity_bonus) * 0.5 + cfg.purity_bonus[tier];

    let offspring = GeneticEntity {
        id: offspring_id,
        strain_name: offspring_name,
        drug: parent_a.drug,
        rarity,
        traits,
        base_yield,
        growth_speed,
        purity_bonus,
        generation: parent_a.generation.max(parent_b.generation) + 1,
        parents: Some((parent_a.strain_name.clone(), parent_b.strain_name.clone())),
    };

    Ok(BreedResult { outcome, offspring })
}

/// Minutes a plant of this strain needs from seed to harvest at the
/// configured base rate. Exposed for tooling and tests.
pub fn full_grow_minutes(base_rate_per_minute: f64, genetics: &GeneticEntity) -> Minutes {
    100.0 / (base_rate_per_minute * genetics.speed_multiplier())
}
