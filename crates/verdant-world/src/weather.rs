//! Weather state machine and the visuals each state asks for
//!
//! Transitions are not driven from here: a repeating timer owned by the
//! weather subsystem calls [`Weather::roll`], which picks the next state
//! uniformly from every state, the current one included.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Weather state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherState {
    #[default]
    Sunny,
    Rainy,
    Cloudy,
    Stormy,
    Foggy,
}

impl WeatherState {
    /// Every state, in the order the roll samples from
    pub const ALL: [WeatherState; 5] = [
        Self::Sunny,
        Self::Rainy,
        Self::Cloudy,
        Self::Stormy,
        Self::Foggy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Rainy => "rainy",
            Self::Cloudy => "cloudy",
            Self::Stormy => "stormy",
            Self::Foggy => "foggy",
        }
    }

    /// Whether rain particles should be visible
    pub fn has_precipitation(&self) -> bool {
        matches!(self, Self::Rainy | Self::Stormy)
    }
}

/// Weather timings and visual parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Seconds between weather rolls
    pub change_interval: f64,
    /// Expected lightning strikes per second while stormy
    pub lightning_rate: f32,
    /// How long a lightning flash stays on screen, in seconds
    pub flash_duration: f64,
    /// Fog density with no weather effect active
    pub baseline_fog_density: f32,
    /// Fog density while foggy
    pub fog_density: f32,
    /// Sky tint while raining
    pub rain_sky_tint: [f32; 3],
    /// Sky tint while storming
    pub storm_sky_tint: [f32; 3],
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            change_interval: 30.0,
            lightning_rate: 0.6,
            flash_duration: 0.1,
            baseline_fog_density: 0.0,
            fog_density: 0.05,
            rain_sky_tint: [0.6, 0.65, 0.7],
            storm_sky_tint: [0.35, 0.35, 0.4],
        }
    }
}

/// What the render collaborator should show for the current weather
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherVisuals {
    pub rain: bool,
    pub lightning: bool,
    pub fog_density: f32,
    pub sky_tint: [f32; 3],
}

impl WeatherVisuals {
    fn baseline(config: &WeatherConfig) -> Self {
        Self {
            rain: false,
            lightning: false,
            fog_density: config.baseline_fog_density,
            sky_tint: [1.0, 1.0, 1.0],
        }
    }

    fn for_state(state: WeatherState, config: &WeatherConfig) -> Self {
        let baseline = Self::baseline(config);
        match state {
            WeatherState::Rainy => Self {
                rain: true,
                sky_tint: config.rain_sky_tint,
                ..baseline
            },
            WeatherState::Stormy => Self {
                rain: true,
                lightning: true,
                sky_tint: config.storm_sky_tint,
                ..baseline
            },
            WeatherState::Foggy => Self {
                fog_density: config.fog_density,
                ..baseline
            },
            WeatherState::Sunny | WeatherState::Cloudy => baseline,
        }
    }
}

/// Weather state and visuals
#[derive(Clone, Debug)]
pub struct Weather {
    pub config: WeatherConfig,
    current: WeatherState,
    visuals: WeatherVisuals,
    flash_active: bool,
}

impl Default for Weather {
    fn default() -> Self {
        Self::new(WeatherConfig::default())
    }
}

impl Weather {
    /// Create sunny weather with the given config
    pub fn new(config: WeatherConfig) -> Self {
        let visuals = WeatherVisuals::for_state(WeatherState::Sunny, &config);
        Self {
            config,
            current: WeatherState::Sunny,
            visuals,
            flash_active: false,
        }
    }

    pub fn current(&self) -> WeatherState {
        self.current
    }

    pub fn visuals(&self) -> WeatherVisuals {
        self.visuals
    }

    /// Whether a lightning flash is currently on screen
    pub fn flash_active(&self) -> bool {
        self.flash_active
    }

    /// Enter a state. Re-entering the current state changes nothing and returns false.
    pub fn set_state(&mut self, state: WeatherState) -> bool {
        if state == self.current {
            return false;
        }
        self.current = state;
        self.visuals = WeatherVisuals::for_state(state, &self.config);
        true
    }

    /// Pick the next state uniformly from all states and enter it
    pub fn roll(&mut self, rng: &mut impl Rng) -> WeatherState {
        let next = *WeatherState::ALL
            .choose(rng)
            .unwrap_or(&WeatherState::Sunny);
        self.set_state(next);
        next
    }

    /// Decide whether a lightning flash starts this tick
    pub fn should_strike(&self, delta: f32, rng: &mut impl Rng) -> bool {
        if !self.visuals.lightning || self.flash_active {
            return false;
        }
        let chance = (self.config.lightning_rate * delta).clamp(0.0, 1.0);
        rng.gen::<f32>() < chance
    }

    /// Show a flash. Returns false if one is already showing.
    pub fn begin_flash(&mut self) -> bool {
        if self.flash_active {
            return false;
        }
        self.flash_active = true;
        true
    }

    /// Remove the flash, returns whether one was showing
    pub fn end_flash(&mut self) -> bool {
        std::mem::replace(&mut self.flash_active, false)
    }
}
