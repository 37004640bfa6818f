//! Simulation clock — owns tick count, game-minutes, and pause.
//!
//! The clock never reads wall time. The external collaborator supplies
//! the per-tick elapsed minutes; every deadline in the core is compared
//! against `minutes`, never against a real timer.

use crate::types::{Minutes, Tick};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub run_id:       String,
    pub current_tick: Tick,
    pub minutes:      Minutes,
    pub paused:       bool,
}

impl SimClock {
    pub fn new(run_id: String) -> Self {
        Self {
            run_id,
            current_tick: 0,
            minutes: 0.0,
            paused: true,
        }
    }

    /// Advance one tick by `delta_minutes`. Returns the new tick number.
    /// Panics if called while paused — callers must check.
    pub fn advance(&mut self, delta_minutes: Minutes) -> Tick {
        assert!(!self.paused, "advance() called on paused clock");
        assert!(delta_minutes >= 0.0, "clock cannot run backwards");
        self.current_tick += 1;
        self.minutes += delta_minutes;
        self.current_tick
    }

    pub fn pause(&mut self)  { self.paused = true;  }
    pub fn resume(&mut self) { self.paused = false; }
}
