//! Day/night cycle with sun/moon position, ambient light, and sky bands

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use verdant_core::Color;

/// Day/night timings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DayNightConfig {
    /// Length of a full day in accumulator seconds
    pub day_length: f64,
    /// Real seconds between accumulator steps
    pub step_interval: f64,
    /// Accumulator seconds added per step
    pub step_amount: f64,
    /// Time of day at session start (0.0 = midnight, 0.5 = noon)
    pub start_fraction: f64,
    /// Radius of the circle the sun and moon travel on
    pub orbit_radius: f32,
}

impl Default for DayNightConfig {
    fn default() -> Self {
        Self {
            day_length: 120.0,
            step_interval: 1.0,
            step_amount: 1.0,
            start_fraction: 0.3,
            orbit_radius: 100.0,
        }
    }
}

/// Sky color band selected by thresholding the time of day
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkyBand {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl SkyBand {
    /// Pick the band for a time-of-day fraction in [0, 1)
    pub fn from_fraction(time_of_day: f32) -> Self {
        if time_of_day < 0.2 {
            Self::Night
        } else if time_of_day < 0.3 {
            Self::Dawn
        } else if time_of_day < 0.7 {
            Self::Day
        } else if time_of_day < 0.8 {
            Self::Dusk
        } else {
            Self::Night
        }
    }

    /// Fixed sky color of this band
    pub fn color(&self) -> Color {
        match self {
            Self::Dawn => Color::from_hex(0xffb37a),
            Self::Day => Color::from_hex(0xb8e6ff),
            Self::Dusk => Color::from_hex(0xff7f50),
            Self::Night => Color::from_hex(0x101a33),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dawn => "Dawn",
            Self::Day => "Day",
            Self::Dusk => "Dusk",
            Self::Night => "Night",
        }
    }
}

/// Day/night state: a single wrapping accumulator
#[derive(Clone, Debug)]
pub struct DayNight {
    pub config: DayNightConfig,
    accumulator: f64,
}

impl Default for DayNight {
    fn default() -> Self {
        Self::new(DayNightConfig::default())
    }
}

impl DayNight {
    pub fn new(config: DayNightConfig) -> Self {
        let day_length = config.day_length.max(f64::EPSILON);
        let accumulator = (config.start_fraction * day_length).rem_euclid(day_length);
        Self {
            config,
            accumulator,
        }
    }

    fn day_length(&self) -> f64 {
        self.config.day_length.max(f64::EPSILON)
    }

    /// Advance by one configured step, wrapping at the end of the day
    pub fn step(&mut self) {
        self.advance(self.config.step_amount);
    }

    /// Advance the accumulator by `seconds`, wrapping at the end of the day
    pub fn advance(&mut self, seconds: f64) {
        let day_length = self.day_length();
        self.accumulator = (self.accumulator + seconds).rem_euclid(day_length);
    }

    /// Set the time of day as a fraction (0.0 = midnight, 0.5 = noon)
    pub fn set_fraction(&mut self, fraction: f64) {
        let day_length = self.day_length();
        self.accumulator = (fraction.rem_euclid(1.0) * day_length).rem_euclid(day_length);
    }

    /// Time of day as a fraction in [0, 1)
    pub fn time_of_day(&self) -> f32 {
        ((self.accumulator / self.day_length()) as f32).clamp(0.0, 1.0 - f32::EPSILON)
    }

    /// Angle on the orbit circle; the sun is overhead at noon
    fn orbit_angle(&self) -> f32 {
        self.time_of_day() * TAU - PI / 2.0
    }

    /// Sun position in world space
    pub fn sun_position(&self) -> Vec3 {
        let angle = self.orbit_angle();
        Vec3::new(angle.cos(), angle.sin(), 0.0) * self.config.orbit_radius
    }

    /// Moon position, antipodal to the sun
    pub fn moon_position(&self) -> Vec3 {
        -self.sun_position()
    }

    /// Ambient light intensity: `max(0.1, sin(timeOfDay * PI))`
    pub fn ambient_intensity(&self) -> f32 {
        (self.time_of_day() * PI).sin().max(0.1)
    }

    pub fn sky_band(&self) -> SkyBand {
        SkyBand::from_fraction(self.time_of_day())
    }

    /// Check if the sun is above the horizon
    pub fn is_day(&self) -> bool {
        self.sun_position().y > 0.0
    }

    /// Get formatted time string (HH:MM)
    pub fn formatted_time(&self) -> String {
        let day_hours = self.time_of_day() * 24.0;
        let hours = day_hours.floor();
        let minutes = ((day_hours - hours) * 60.0).floor();
        format!("{:02}:{:02}", hours as u32, minutes as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_wraps() {
        let mut cycle = DayNight::new(DayNightConfig {
            day_length: 10.0,
            start_fraction: 0.0,
            ..Default::default()
        });
        for _ in 0..12 {
            cycle.step();
        }
        assert!((cycle.time_of_day() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_sun_and_moon_antipodal() {
        let mut cycle = DayNight::default();
        cycle.set_fraction(0.5);
        let sun = cycle.sun_position();
        assert!((sun - Vec3::new(0.0, 100.0, 0.0)).length() < 1e-3);
        assert_eq!(cycle.moon_position(), -sun);
        assert!(cycle.is_day());

        cycle.set_fraction(0.0);
        assert!(cycle.sun_position().y < 0.0);
        assert!(!cycle.is_day());
    }

    #[test]
    fn test_ambient_intensity_floor() {
        let mut cycle = DayNight::default();
        cycle.set_fraction(0.0);
        assert_eq!(cycle.ambient_intensity(), 0.1);

        cycle.set_fraction(0.5);
        assert!((cycle.ambient_intensity() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sky_bands() {
        assert_eq!(SkyBand::from_fraction(0.1), SkyBand::Night);
        assert_eq!(SkyBand::from_fraction(0.25), SkyBand::Dawn);
        assert_eq!(SkyBand::from_fraction(0.5), SkyBand::Day);
        assert_eq!(SkyBand::from_fraction(0.75), SkyBand::Dusk);
        assert_eq!(SkyBand::from_fraction(0.9), SkyBand::Night);
    }

    #[test]
    fn test_formatted_time() {
        let mut cycle = DayNight::new(DayNightConfig {
            day_length: 1440.0,
            start_fraction: 0.0,
            ..Default::default()
        });
        assert_eq!(cycle.formatted_time(), "00:00");

        // 1440 seconds per day: one second per in-game minute
        cycle.advance(13.0 * 60.0 + 7.5);
        assert_eq!(cycle.formatted_time(), "13:07");
    }
}
