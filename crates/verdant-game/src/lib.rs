//! Verdant Game - Per-frame world simulation
//!
//! Provides the progression ledger, proximity zones, player kinematics,
//! the isolating subsystem scheduler, and the [`World`] that drives them.

pub mod config;
pub mod events;
pub mod flowers;
pub mod npc;
pub mod particles;
pub mod player;
pub mod progression;
pub mod quest;
pub mod scheduler;
pub mod subsystem;
pub mod subsystems;
pub mod world;
pub mod zone;

pub use config::WorldConfig;
pub use events::{GameEvent, Lighting, SceneCommand, WorldEvent};
pub use flowers::{CollectibleFlower, FlowerBed, FlowerConfig};
pub use npc::{Npc, NpcConfig, NpcCrowd, NpcId};
pub use particles::{ParticleConfig, ParticleEffects};
pub use player::{MovementConfig, PlayerInput, PlayerState};
pub use progression::{
    ProgressionConfig, ProgressionEvent, ProgressionLedger, Skill, SkillError, SkillUnlock,
};
pub use quest::{ObjectiveKind, Quest, QuestId, QuestLog};
pub use scheduler::{Lifecycle, SchedulerReport, SubsystemFailure, SubsystemScheduler};
pub use subsystem::{FnSubsystem, PlayerSnapshot, Shared, Subsystem, SubsystemError, TickContext};
pub use world::{Frame, FrameSink, HudSnapshot, TickReport, World};
pub use zone::{ProximityTriggerEngine, Zone, ZoneId, ZoneKind, ZoneLayout, ZoneSpec};
