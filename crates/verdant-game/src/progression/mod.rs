//! Progression: health, energy, experience, levels, and skills

mod ledger;
pub mod skill;

pub use ledger::{ProgressionConfig, ProgressionEvent, ProgressionLedger, MAX_STAT};
pub use skill::{
    Skill, SkillError, SkillUnlock, ENERGY_MULTIPLIER, EXPERIENCE_MULTIPLIER, HEALING_MULTIPLIER,
};
