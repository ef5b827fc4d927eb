//! Discrete-event simulation clock
//!
//! One tick is one millisecond of simulated time, which is also exactly one
//! subframe of the air-interface calendar. Devices advance the clock from the
//! outside and drive their timers and schedulers from it; nothing in the core
//! reads wall-clock time.

use crate::subframe::SubframeInfo;
use serde::{Deserialize, Serialize};

/// Simulation tick counter (1 tick = 1 ms = 1 subframe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimulationTick(u64);

impl SimulationTick {
    /// Creates a new simulation tick
    pub fn new(tick: u64) -> Self {
        Self(tick)
    }

    /// Creates the initial tick (tick 0)
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the tick value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Advances to the next tick
    pub fn next(&mut self) {
        self.0 += 1;
    }

    /// Advances by N ticks
    pub fn advance(&mut self, n: u64) {
        self.0 += n;
    }

    /// Returns a tick advanced by N ticks without mutating
    pub fn advanced_by(&self, n: u64) -> Self {
        Self(self.0 + n)
    }

    /// Returns true if this is the initial tick
    pub fn is_initial(&self) -> bool {
        self.0 == 0
    }

    /// Calculates the difference between two ticks
    pub fn diff(&self, other: &SimulationTick) -> u64 {
        self.0.abs_diff(other.0)
    }
}

impl std::fmt::Display for SimulationTick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tick({})", self.0)
    }
}

impl From<u64> for SimulationTick {
    fn from(tick: u64) -> Self {
        Self::new(tick)
    }
}

impl From<SimulationTick> for u64 {
    fn from(tick: SimulationTick) -> u64 {
        tick.0
    }
}

/// Simulation clock for coordinating device callbacks
#[derive(Debug, Default)]
pub struct SimulationClock {
    current_tick: SimulationTick,
}

impl Default for SimulationTick {
    fn default() -> Self {
        Self::initial()
    }
}

impl SimulationClock {
    /// Creates a new simulation clock at tick 0
    pub fn new() -> Self {
        Self {
            current_tick: SimulationTick::initial(),
        }
    }

    /// Returns the current tick
    pub fn current_tick(&self) -> SimulationTick {
        self.current_tick
    }

    /// Advances the clock by one tick (one subframe)
    pub fn tick(&mut self) {
        self.current_tick.next();
    }

    /// Advances the clock by N ticks
    pub fn advance(&mut self, n: u64) {
        self.current_tick.advance(n);
    }

    /// Returns the current simulation time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.current_tick.value()
    }

    /// Returns the air-interface position of the current tick
    pub fn current_subframe(&self) -> SubframeInfo {
        SubframeInfo::from_absolute((self.current_tick.value() % 10240) as u32)
    }

    /// Resets the clock to tick 0
    pub fn reset(&mut self) {
        self.current_tick = SimulationTick::initial();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_creation() {
        let tick = SimulationTick::new(42);
        assert_eq!(tick.value(), 42);
        assert_eq!(format!("{tick}"), "Tick(42)");
    }

    #[test]
    fn test_tick_initial() {
        let tick = SimulationTick::initial();
        assert_eq!(tick.value(), 0);
        assert!(tick.is_initial());
    }

    #[test]
    fn test_tick_advance() {
        let mut tick = SimulationTick::new(10);
        tick.advance(5);
        assert_eq!(tick.value(), 15);

        let advanced = tick.advanced_by(10);
        assert_eq!(advanced.value(), 25);
        assert_eq!(tick.value(), 15);
    }

    #[test]
    fn test_tick_diff() {
        let tick1 = SimulationTick::new(10);
        let tick2 = SimulationTick::new(25);
        assert_eq!(tick1.diff(&tick2), 15);
        assert_eq!(tick2.diff(&tick1), 15);
    }

    #[test]
    fn test_clock_advances() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.now_ms(), 0);
        clock.tick();
        clock.tick();
        assert_eq!(clock.now_ms(), 2);
        clock.advance(8);
        assert_eq!(clock.now_ms(), 10);
    }

    #[test]
    fn test_clock_subframe_mapping() {
        let mut clock = SimulationClock::new();
        clock.advance(10235);
        let sf = clock.current_subframe();
        assert_eq!(sf.frame_no, 1023);
        assert_eq!(sf.subframe_no, 5);

        // second hyperframe starts over
        clock.advance(5);
        assert_eq!(clock.current_subframe().absolute(), 0);
    }

    #[test]
    fn test_clock_reset() {
        let mut clock = SimulationClock::new();
        clock.advance(3);
        clock.reset();
        assert_eq!(clock.current_tick().value(), 0);
    }
}
