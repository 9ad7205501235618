//! Deterministic time system
//!
//! Fixed 60Hz tick rate. Moving objects integrate with the fixed step, so the
//! same seed and tick count always produce the same world.

use std::time::Duration;

/// Fixed simulation tick rate (60 Hz = 16.666ms per tick)
pub const TICK_RATE_HZ: u32 = 60;
pub const TICK_DURATION: Duration = Duration::from_micros(16_666); // ~16.666ms

/// Simulation time tracker
pub struct SimulationTime {
    tick_count: u64,
    accumulated_time: Duration,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self {
            tick_count: 0,
            accumulated_time: Duration::ZERO,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn advance_tick(&mut self) {
        self.tick_count += 1;
        self.accumulated_time += TICK_DURATION;
    }

    pub fn total_time(&self) -> Duration {
        self.accumulated_time
    }

    /// Step size in seconds used for integration.
    pub fn delta_seconds(&self) -> f32 {
        1.0 / TICK_RATE_HZ as f32
    }
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self::new()
    }
}
