//! Progression ledger
//!
//! Single owner of the player's health, energy, experience, level, skill
//! points, and skills. Zones, quests, and the skill tracker mutate progression
//! only through these operations.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::skill::{
    Skill, SkillError, SkillUnlock, ENERGY_MULTIPLIER, EXPERIENCE_MULTIPLIER, HEALING_MULTIPLIER,
};

/// Upper bound of health and energy
pub const MAX_STAT: f32 = 100.0;

/// Starting values and level curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub starting_health: f32,
    pub starting_energy: f32,
    /// Experience needed to go from level 1 to level 2
    pub first_level_threshold: f32,
    /// Factor applied to the threshold on every level-up
    pub threshold_growth: f32,
    /// Health and energy restored on level-up
    pub level_up_restore: f32,
    /// Skill points granted on level-up
    pub skill_points_per_level: u32,
    /// Skills known from the start
    pub starting_skills: Vec<Skill>,
    /// Skills registered by the skill tracker once their level is reached
    pub unlockable_skills: Vec<SkillUnlock>,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            starting_health: MAX_STAT,
            starting_energy: MAX_STAT,
            first_level_threshold: 100.0,
            threshold_growth: 1.5,
            level_up_restore: 50.0,
            skill_points_per_level: 1,
            starting_skills: vec![Skill::new("Healing", HEALING_MULTIPLIER, 5, 0.1)],
            unlockable_skills: vec![
                SkillUnlock {
                    unlock_level: 2,
                    skill: Skill::new("Meditation", ENERGY_MULTIPLIER, 5, 0.1),
                },
                SkillUnlock {
                    unlock_level: 3,
                    skill: Skill::new("Wisdom", EXPERIENCE_MULTIPLIER, 5, 0.05),
                },
            ],
        }
    }
}

/// Notifications for the UI, effect, and sound collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressionEvent {
    LevelUp { level: u32 },
    SkillLearned { name: String },
    SkillRaised { name: String, level: u32 },
}

/// Player progression state
#[derive(Debug, Clone)]
pub struct ProgressionLedger {
    pub config: ProgressionConfig,
    health: f32,
    energy: f32,
    experience: f32,
    level: u32,
    experience_to_next_level: f32,
    skill_points: u32,
    healing_progress: f32,
    meditation_time: f32,
    skills: Vec<Skill>,
    events: Vec<ProgressionEvent>,
}

impl Default for ProgressionLedger {
    fn default() -> Self {
        Self::new(ProgressionConfig::default())
    }
}

impl ProgressionLedger {
    pub fn new(config: ProgressionConfig) -> Self {
        Self {
            health: config.starting_health.clamp(0.0, MAX_STAT),
            energy: config.starting_energy.clamp(0.0, MAX_STAT),
            experience: 0.0,
            level: 1,
            experience_to_next_level: config.first_level_threshold.max(f32::EPSILON),
            skill_points: 0,
            healing_progress: 0.0,
            meditation_time: 0.0,
            skills: config.starting_skills.clone(),
            events: Vec::new(),
            config,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn experience(&self) -> f32 {
        self.experience
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience_to_next_level(&self) -> f32 {
        self.experience_to_next_level
    }

    /// Progress toward next level as a 0.0-1.0 fraction
    pub fn experience_fraction(&self) -> f32 {
        (self.experience / self.experience_to_next_level).clamp(0.0, 1.0)
    }

    pub fn skill_points(&self) -> u32 {
        self.skill_points
    }

    /// Restorative progress bar filled by meditation (0.0-1.0)
    pub fn healing_progress(&self) -> f32 {
        self.healing_progress
    }

    pub fn meditation_time(&self) -> f32 {
        self.meditation_time
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name == name)
    }

    /// Bonus for an effect name, or 1.0 when no skill provides it
    pub fn multiplier(&self, effect: &str) -> f32 {
        self.skills
            .iter()
            .find(|s| s.effect == effect)
            .map(Skill::multiplier)
            .unwrap_or(1.0)
    }

    /// Heal by `amount` scaled by the healing multiplier. Returns the new health.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let amount = amount.max(0.0) * self.multiplier(HEALING_MULTIPLIER);
        self.health = (self.health + amount).clamp(0.0, MAX_STAT);
        self.health
    }

    /// Lose health. Returns the new health.
    pub fn damage(&mut self, amount: f32) -> f32 {
        self.health = (self.health - amount.max(0.0)).clamp(0.0, MAX_STAT);
        self.health
    }

    /// Restore energy scaled by the energy multiplier. Returns the new energy.
    pub fn restore_energy(&mut self, amount: f32) -> f32 {
        let amount = amount.max(0.0) * self.multiplier(ENERGY_MULTIPLIER);
        self.energy = (self.energy + amount).clamp(0.0, MAX_STAT);
        self.energy
    }

    /// Passive energy loss. Returns the new energy.
    pub fn drain_energy(&mut self, amount: f32) -> f32 {
        self.energy = (self.energy - amount.max(0.0)).clamp(0.0, MAX_STAT);
        self.energy
    }

    /// Add experience scaled by the experience multiplier.
    ///
    /// Returns true if this call caused a level-up.
    pub fn add_experience(&mut self, amount: f32) -> bool {
        let amount = amount.max(0.0) * self.multiplier(EXPERIENCE_MULTIPLIER);
        self.experience = (self.experience + amount).max(0.0);

        if self.experience >= self.experience_to_next_level {
            self.level_up();
            return true;
        }
        false
    }

    /// Advance to the next level.
    ///
    /// Experience past the threshold is discarded, not carried over.
    fn level_up(&mut self) {
        self.level += 1;
        self.experience = 0.0;
        self.experience_to_next_level *= self.config.threshold_growth;

        let restore = self.config.level_up_restore.max(0.0);
        self.health = (self.health + restore).clamp(0.0, MAX_STAT);
        self.energy = (self.energy + restore).clamp(0.0, MAX_STAT);
        self.skill_points += self.config.skill_points_per_level;

        info!(
            level = self.level,
            next_threshold = self.experience_to_next_level,
            "Level up"
        );
        self.events.push(ProgressionEvent::LevelUp { level: self.level });
    }

    /// Fill the healing progress bar, capped at 1.0
    pub fn advance_healing_progress(&mut self, amount: f32) -> f32 {
        self.healing_progress = (self.healing_progress + amount.max(0.0)).clamp(0.0, 1.0);
        self.healing_progress
    }

    pub fn add_meditation_time(&mut self, amount: f32) {
        self.meditation_time += amount.max(0.0);
    }

    /// Grant skill points outside of levelling (quest rewards)
    pub fn grant_skill_points(&mut self, points: u32) {
        self.skill_points += points;
    }

    /// Learn a new skill. Returns false if a skill with that name is already known.
    pub fn register_skill(&mut self, skill: Skill) -> bool {
        if self.skill(&skill.name).is_some() {
            return false;
        }
        debug!(skill = %skill.name, effect = %skill.effect, "Skill learned");
        self.events.push(ProgressionEvent::SkillLearned {
            name: skill.name.clone(),
        });
        self.skills.push(skill);
        true
    }

    /// Spend one point to raise a skill. Returns the skill's new level.
    ///
    /// On error nothing changes.
    pub fn spend_skill_point(&mut self, name: &str) -> Result<u32, SkillError> {
        let available = self.skill_points;
        let skill = self
            .skills
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| SkillError::UnknownSkill(name.to_string()))?;

        if skill.is_maxed() {
            return Err(SkillError::MaxLevel {
                name: skill.name.clone(),
                max_level: skill.max_level,
            });
        }
        if available == 0 {
            return Err(SkillError::NoPoints);
        }

        skill.level += 1;
        let level = skill.level;
        self.skill_points -= 1;
        self.events.push(ProgressionEvent::SkillRaised {
            name: name.to_string(),
            level,
        });
        Ok(level)
    }

    /// Drain pending notifications
    pub fn take_events(&mut self) -> Vec<ProgressionEvent> {
        std::mem::take(&mut self.events)
    }
}
