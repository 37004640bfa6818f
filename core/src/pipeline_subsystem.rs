//! Pipeline subsystem — passive time advance for every grow slot and
//! processing station. Runs first each tick so workers and customers
//! see fresh pipeline state.

use crate::{
    config::SimConfig,
    error::SimResult,
    event::SimEvent,
    rng::SubsystemRng,
    store::{pipeline::PipelineChange, WorldState},
    subsystem::{SimSubsystem, TickCtx},
};

pub struct PipelineSubsystem {
    config: SimConfig,
}

impl PipelineSubsystem {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for PipelineSubsystem {
    fn name(&self) -> &'static str {
        "pipeline"
    }

    fn update(
        &mut self,
        ctx: &TickCtx,
        world: &mut WorldState,
        _rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        let changes =
            world
                .pipeline
                .advance_all(ctx.delta_minutes, &self.config.growth, &self.config);

        let mut out = Vec::with_capacity(changes.len());
        for change in changes {
            match change {
                PipelineChange::PlantMatured { slot_id, strain } => {
                    log::debug!("tick={} pipeline: slot {slot_id} matured ({strain})", ctx.tick);
                    out.push(SimEvent::PlantMatured {
                        tick: ctx.tick,
                        slot_id,
                        strain,
                    });
                }
                PipelineChange::StationReady { station_id } => {
                    log::debug!("tick={} pipeline: station {station_id} ready", ctx.tick);
                    out.push(SimEvent::BatchReady {
                        tick: ctx.tick,
                        station_id,
                    });
                }
            }
        }
        Ok(out)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
