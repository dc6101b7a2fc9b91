//! World configuration
//!
//! Every tunable of a session in one serde-friendly tree. Every struct in the
//! tree defaults field by field, so a settings file only needs the values it
//! changes.

use serde::{Deserialize, Serialize};
use verdant_core::TimeConfig;
use verdant_world::{EnvironmentConfig, TerrainConfig, VegetationConfig};

use crate::flowers::FlowerConfig;
use crate::npc::NpcConfig;
use crate::particles::ParticleConfig;
use crate::player::MovementConfig;
use crate::progression::ProgressionConfig;
use crate::quest::{default_quests, Quest};
use crate::zone::ZoneLayout;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Seed for every random choice in the session
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub time: TimeConfig,
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub progression: ProgressionConfig,
    #[serde(default)]
    pub zones: ZoneLayout,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub vegetation: VegetationConfig,
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub npcs: NpcConfig,
    #[serde(default)]
    pub flowers: FlowerConfig,
    #[serde(default)]
    pub particles: ParticleConfig,
    #[serde(default = "default_quests")]
    pub quests: Vec<Quest>,
    /// Energy lost per tick while not meditating
    #[serde(default = "default_energy_drain")]
    pub passive_energy_drain: f32,
    /// Seconds the level-up banner stays visible
    #[serde(default = "default_banner_duration")]
    pub banner_duration: f64,
    /// Distance at which the player touches an NPC
    #[serde(default = "default_contact_radius")]
    pub contact_radius: f32,
}

fn default_seed() -> u64 {
    0x0b10_55e5
}

fn default_energy_drain() -> f32 {
    0.01
}

fn default_banner_duration() -> f64 {
    2.0
}

fn default_contact_radius() -> f32 {
    1.0
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            time: TimeConfig::default(),
            movement: MovementConfig::default(),
            progression: ProgressionConfig::default(),
            zones: ZoneLayout::default(),
            environment: EnvironmentConfig::default(),
            vegetation: VegetationConfig::default(),
            terrain: TerrainConfig::default(),
            npcs: NpcConfig::default(),
            flowers: FlowerConfig::default(),
            particles: ParticleConfig::default(),
            quests: default_quests(),
            passive_energy_drain: default_energy_drain(),
            banner_duration: default_banner_duration(),
            contact_radius: default_contact_radius(),
        }
    }
}
