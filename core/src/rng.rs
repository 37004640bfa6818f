//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through SubsystemRng instances derived from
//! the single master seed held by the engine.
//!
//! Each subsystem gets its own stream, derived from
//! (master_seed, subsystem slot, tick). This means:
//!   - Adding a new subsystem never changes existing subsystems' streams.
//!   - A stream can be reproduced in isolation for any (slot, tick).
//!   - Commands draw from their own salted streams, so replaying the
//!     same command sequence replays the same rolls.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single subsystem stream.
pub struct SubsystemRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SubsystemRng {
    /// Derive a stream from the master seed, a stable slot index, and a
    /// salt (the tick for subsystems, a command counter for commands).
    /// Slot indices must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64, salt: u64) -> Self {
        let derived = master_seed
            ^ slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15)
            ^ salt.wrapping_mul(0xbf58_476d_1ce4_e5b9);
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform float in [lo, hi).
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Gaussian-like jitter in [-spread, +spread], centered on zero.
    /// Sum of three uniforms — cheap bell shape, good enough for
    /// quality/yield noise.
    pub fn jitter(&mut self, spread: f64) -> f64 {
        let s = self.next_f64() + self.next_f64() + self.next_f64();
        (s / 1.5 - 1.0) * spread
    }

    /// Weighted choice: returns the index of the selected weight.
    /// Zero or negative weights are never selected. Panics only if the
    /// total weight is not positive — callers own their weight tables.
    pub fn weighted_index(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        assert!(total > 0.0, "weighted_index needs a positive total weight");
        let mut roll = self.next_f64() * total;
        for (i, w) in weights.iter().enumerate() {
            if *w <= 0.0 {
                continue;
            }
            roll -= w;
            if roll < 0.0 {
                return i;
            }
        }
        weights.len() - 1
    }
}

/// Factory for all streams of a single run.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// The per-tick stream for a subsystem.
    pub fn for_subsystem_at_tick(&self, slot: SubsystemSlot, tick: u64) -> SubsystemRng {
        SubsystemRng::new(self.master_seed, slot as u64, tick).with_name(slot.name())
    }

    /// A salted stream for a player command. The engine supplies a
    /// monotonically increasing counter so two commands in the same
    /// tick never share a stream.
    pub fn for_command(&self, slot: SubsystemSlot, counter: u64) -> SubsystemRng {
        SubsystemRng::new(self.master_seed, slot as u64 | 0x8000, counter)
            .with_name(slot.name())
    }
}

/// Stable subsystem slot assignments.
/// NEVER reorder or remove entries — only append.
/// Reordering changes every subsystem's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum SubsystemSlot {
    Pipeline = 0,
    Worker   = 1,
    Demand   = 2,
    Breeding = 3,
    Flavor   = 4,
    // Add new subsystems here — append only.
}

impl SubsystemSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pipeline => "pipeline",
            Self::Worker   => "worker",
            Self::Demand   => "demand",
            Self::Breeding => "breeding",
            Self::Flavor   => "flavor",
        }
    }
}
