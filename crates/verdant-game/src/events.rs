//! Deferred timer events, scene commands, and gameplay notifications

use glam::Vec3;
use verdant_core::{Color, EntityId};
use verdant_world::{WeatherState, WeatherVisuals};

use crate::npc::NpcId;
use crate::quest::QuestId;

/// Payload of an entry in the world's timer queue
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    /// Pick a new weather state
    WeatherChange,
    /// Advance the day/night accumulator by one step
    DayNightStep,
    /// Clear the current lightning flash
    EndLightningFlash,
    /// Remove a transient particle burst
    RemoveBurst(EntityId),
    /// Hide the level-up banner
    HideLevelUpBanner,
}

/// Lighting state handed to the renderer every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub sun_position: Vec3,
    pub moon_position: Vec3,
    pub ambient_intensity: f32,
    pub sky_color: Color,
}

/// Instruction for the render collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// Remove an entity from the scene
    Remove(EntityId),
    /// Spawn a burst of particles
    SpawnBurst {
        handle: EntityId,
        position: Vec3,
        count: usize,
    },
    ShowLightning,
    HideLightning,
    /// Rain, fog, and sky tint changed
    SetWeatherVisuals(WeatherVisuals),
    ShowLevelUpBanner {
        level: u32,
    },
    HideLevelUpBanner,
}

/// Gameplay notification for HUD, sound, and logging
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LevelUp { level: u32 },
    SkillUnlocked { name: String },
    SkillRaised { name: String, level: u32 },
    FlowerCollected { handle: EntityId },
    QuestCompleted { id: QuestId, title: String },
    WeatherChanged { state: WeatherState },
    NpcEncounter { npc: NpcId },
}
