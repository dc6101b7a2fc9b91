//! Environment cycle: weather and day/night composed into one lighting state
//!
//! The two state machines advance independently on their own timers; this
//! type only combines them for the render collaborator.

use serde::{Deserialize, Serialize};
use verdant_core::Color;

use crate::day_night::{DayNight, DayNightConfig};
use crate::weather::{Weather, WeatherConfig};

/// Combined environment configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub weather: WeatherConfig,
    pub day_night: DayNightConfig,
}

/// Weather plus day/night
#[derive(Clone, Debug, Default)]
pub struct Environment {
    pub weather: Weather,
    pub day_night: DayNight,
}

impl Environment {
    pub fn new(config: EnvironmentConfig) -> Self {
        Self {
            weather: Weather::new(config.weather),
            day_night: DayNight::new(config.day_night),
        }
    }

    /// Sky color: the day/night band darkened by the weather tint
    pub fn sky_color(&self) -> Color {
        self.day_night
            .sky_band()
            .color()
            .tinted(self.weather.visuals().sky_tint)
    }

    /// Name of the current weather for the HUD
    pub fn weather_name(&self) -> &'static str {
        self.weather.current().name()
    }

    /// `HH:MM` time string for the HUD
    pub fn time_string(&self) -> String {
        self.day_night.formatted_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::WeatherState;

    #[test]
    fn test_storm_darkens_sky() {
        let mut env = Environment::default();
        env.day_night.set_fraction(0.5);
        let clear = env.sky_color();

        env.weather.set_state(WeatherState::Stormy);
        let storm = env.sky_color();

        assert!(storm.r < clear.r);
        assert!(storm.b < clear.b);
        assert_eq!(env.weather_name(), "stormy");
    }
}
