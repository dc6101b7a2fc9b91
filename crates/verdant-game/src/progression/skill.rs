//! Skills: named multipliers raised by spending skill points

use serde::{Deserialize, Serialize};

/// Effect name read by [`super::ProgressionLedger::heal`]
pub const HEALING_MULTIPLIER: &str = "healingMultiplier";
/// Effect name read by [`super::ProgressionLedger::restore_energy`]
pub const ENERGY_MULTIPLIER: &str = "energyMultiplier";
/// Effect name read by [`super::ProgressionLedger::add_experience`]
pub const EXPERIENCE_MULTIPLIER: &str = "experienceMultiplier";

/// A learned skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    /// Which multiplier this skill contributes to
    pub effect: String,
    /// Current level, 1 to `max_level`
    pub level: u32,
    pub max_level: u32,
    /// Multiplier gained per level above the first
    pub bonus_per_level: f32,
}

impl Skill {
    /// Create a level 1 skill
    pub fn new(
        name: impl Into<String>,
        effect: impl Into<String>,
        max_level: u32,
        bonus_per_level: f32,
    ) -> Self {
        Self {
            name: name.into(),
            effect: effect.into(),
            level: 1,
            max_level: max_level.max(1),
            bonus_per_level,
        }
    }

    /// Multiplier contributed at the current level (1.0 at level 1)
    pub fn multiplier(&self) -> f32 {
        1.0 + self.bonus_per_level * (self.level.saturating_sub(1)) as f32
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.max_level
    }
}

/// A skill that becomes available once the player reaches a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillUnlock {
    pub unlock_level: u32,
    pub skill: Skill,
}

/// Why a skill point could not be spent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkillError {
    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    #[error("{name} is already at its maximum level ({max_level})")]
    MaxLevel { name: String, max_level: u32 },

    #[error("No skill points available")]
    NoPoints,
}
