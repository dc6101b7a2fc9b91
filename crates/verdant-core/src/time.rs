//! Frame clock for the Verdant simulation
//!
//! Tracks elapsed and delta time independently of the display refresh rate.

use serde::{Deserialize, Serialize};

/// Configuration for simulation time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many simulated seconds pass per real second
    pub time_scale: f32,
    /// Maximum delta time to prevent a long stall turning into a huge step
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delta_time: 0.25,
        }
    }
}

/// Simulation time tracking
#[derive(Debug, Clone)]
pub struct Clock {
    /// Configuration
    pub config: TimeConfig,
    /// Time since session start in seconds
    elapsed: f64,
    /// Delta time for this frame (clamped and scaled)
    delta: f32,
    /// Unscaled delta time
    unscaled_delta: f32,
    /// Tick counter
    ticks: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(TimeConfig::default())
    }
}

impl Clock {
    /// Create a clock with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            elapsed: 0.0,
            delta: 0.0,
            unscaled_delta: 0.0,
            ticks: 0,
        }
    }

    /// Advance the clock with the raw delta reported by the render collaborator
    ///
    /// A negative or NaN `max_delta_time` or `time_scale` from a settings
    /// file counts as zero, and a non-finite raw delta is ignored.
    pub fn advance(&mut self, raw_delta: f32) {
        let max_delta = self.config.max_delta_time.max(0.0);
        let raw_delta = if raw_delta.is_finite() { raw_delta } else { 0.0 };
        self.unscaled_delta = raw_delta.clamp(0.0, max_delta);
        self.ticks += 1;

        self.delta = self.unscaled_delta * self.config.time_scale.max(0.0);
        self.elapsed += self.delta as f64;
    }

    /// Seconds of simulated time since the session started
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Elapsed time narrowed for per-instance trigonometry
    pub fn elapsed_f32(&self) -> f32 {
        self.elapsed as f32
    }

    /// Scaled delta of the current tick
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Delta of the current tick before scaling
    pub fn unscaled_delta(&self) -> f32 {
        self.unscaled_delta
    }

    /// Number of ticks advanced so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal, 2.0 = double speed)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advance() {
        let mut clock = Clock::default();
        clock.advance(0.016);

        assert!(clock.delta() > 0.0);
        assert_eq!(clock.ticks(), 1);
        assert!((clock.elapsed() - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_bad_config_does_not_panic() {
        let mut clock = Clock::new(TimeConfig {
            time_scale: f32::NAN,
            max_delta_time: -1.0,
        });
        clock.advance(0.016);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.ticks(), 1);

        clock.config.max_delta_time = f32::NAN;
        clock.config.time_scale = -2.0;
        clock.advance(0.016);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_non_finite_delta_is_ignored() {
        let mut clock = Clock::default();
        clock.advance(f32::NAN);
        assert_eq!(clock.delta(), 0.0);
        clock.advance(f32::INFINITY);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = Clock::default();
        clock.advance(5.0);
        assert_eq!(clock.delta(), 0.25);

        clock.advance(-1.0);
        assert_eq!(clock.delta(), 0.0);
    }

    #[test]
    fn test_time_scale() {
        let mut clock = Clock::default();
        clock.set_time_scale(2.0);
        clock.advance(0.1);
        assert!((clock.delta() - 0.2).abs() < 1e-6);

        clock.set_time_scale(-3.0);
        assert_eq!(clock.config.time_scale, 0.0);
    }
}
