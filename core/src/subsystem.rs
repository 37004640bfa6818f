//! Subsystem trait and tick context.
//!
//! RULE: Every per-tick behavior implements SimSubsystem. The engine
//! calls update() on each registered subsystem in registration order,
//! every tick. Execution order is fixed and documented in engine.rs;
//! later subsystems see earlier subsystems' effects within the same
//! tick — there are no stale reads.

use crate::{
    error::SimResult,
    event::SimEvent,
    rng::SubsystemRng,
    store::WorldState,
    types::{Minutes, Tick},
};
use std::any::Any;

/// Everything a subsystem knows about the current tick.
#[derive(Debug, Clone, Copy)]
pub struct TickCtx {
    pub tick:          Tick,
    /// Game-minutes at the end of this tick's clock advance.
    pub minutes:       Minutes,
    pub delta_minutes: Minutes,
}

/// The contract every subsystem must fulfill.
pub trait SimSubsystem: Send {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// Called once per tick by the engine.
    ///
    /// Returns the events to append to the tick's log. All world
    /// mutation goes through the aggregates on `world`.
    fn update(
        &mut self,
        ctx: &TickCtx,
        world: &mut WorldState,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>>;

    /// For downcasting in tests and tooling only.
    fn as_any(&self) -> &dyn Any;
}
