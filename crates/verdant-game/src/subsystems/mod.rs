//! Built-in subsystems ticked by the scheduler

mod collision;
mod day_night;
mod flowers;
mod particles;
mod pathing;
mod quests;
mod skills;
mod terrain;
mod vegetation;
mod weather;

pub use collision::CollisionTracker;
pub use day_night::DayNightCycle;
pub use flowers::FlowerGrowth;
pub use particles::ParticlePlayback;
pub use pathing::NpcPathing;
pub use quests::QuestTracker;
pub use skills::SkillTracker;
pub use terrain::{GroundSample, TerrainTracker};
pub use vegetation::VegetationGrowth;
pub use weather::WeatherCycle;
