//! Verdant World - Environment and vegetation simulation
//!
//! Provides the weather and day/night state machines, the rolling terrain
//! heightfield, and the instanced vegetation field.

pub mod day_night;
pub mod environment;
pub mod terrain;
pub mod vegetation;
pub mod weather;

pub use day_night::{DayNight, DayNightConfig, SkyBand};
pub use environment::{Environment, EnvironmentConfig};
pub use terrain::{Terrain, TerrainConfig, TerrainError};
pub use vegetation::{
    VegetationConfig, VegetationError, VegetationField, VegetationInstance, VegetationTick,
};
pub use weather::{Weather, WeatherConfig, WeatherState, WeatherVisuals};
