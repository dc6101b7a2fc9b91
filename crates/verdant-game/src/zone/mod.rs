//! Proximity zones: healing springs, meditation spots, and flower pickups
//!
//! Every "stand near X to get effect Y" mechanic is a [`Zone`] evaluated by
//! the [`ProximityTriggerEngine`] once per tick.

mod engine;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use verdant_core::EntityId;

use crate::progression::ProgressionLedger;

pub use engine::{horizontal_distance, ProximityReport, ProximityTriggerEngine};

/// Unique identifier for a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u64);

/// What a zone represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    Healing,
    Meditation,
    Collectible,
}

/// When a zone fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerMode {
    /// Every tick the player is inside
    EveryTick,
    /// The first tick the player is inside, then the zone is removed
    Once,
}

/// A single ledger operation a zone can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerOp {
    Heal,
    RestoreEnergy,
    AddExperience,
    HealingProgress,
    MeditationTime,
}

/// One operation with its per-fire amount
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectTerm {
    pub op: LedgerOp,
    pub amount: f32,
}

/// Ledger operations applied each time a zone fires
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneEffect {
    pub terms: Vec<EffectTerm>,
}

impl ZoneEffect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a term
    pub fn with(mut self, op: LedgerOp, amount: f32) -> Self {
        self.terms.push(EffectTerm { op, amount });
        self
    }

    /// Run every term against the ledger.
    ///
    /// Returns true if an experience term caused a level-up.
    pub fn apply(&self, ledger: &mut ProgressionLedger) -> bool {
        let mut leveled = false;
        for term in &self.terms {
            match term.op {
                LedgerOp::Heal => {
                    ledger.heal(term.amount);
                }
                LedgerOp::RestoreEnergy => {
                    ledger.restore_energy(term.amount);
                }
                LedgerOp::AddExperience => leveled |= ledger.add_experience(term.amount),
                LedgerOp::HealingProgress => {
                    ledger.advance_healing_progress(term.amount);
                }
                LedgerOp::MeditationTime => ledger.add_meditation_time(term.amount),
            }
        }
        leveled
    }
}

/// A trigger region on the ground plane
#[derive(Debug, Clone)]
pub struct Zone {
    pub id: ZoneId,
    pub kind: ZoneKind,
    pub position: Vec3,
    pub radius: f32,
    pub effect: ZoneEffect,
    pub mode: TriggerMode,
    /// Visual handle owned by the render collaborator
    pub handle: EntityId,
    /// Whether the player stood inside on the last evaluation (glow only)
    pub occupied: bool,
}

/// Description of a zone before it is registered with the engine
#[derive(Debug, Clone)]
pub struct ZoneSpec {
    pub kind: ZoneKind,
    pub position: Vec3,
    pub radius: f32,
    pub effect: ZoneEffect,
    pub mode: TriggerMode,
}

/// Parameters for one family of zones
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTemplate {
    /// How many are placed at world build
    pub count: usize,
    /// Half-size of the square they are scattered over
    pub extent: f32,
    pub radius: f32,
    pub effect: ZoneEffect,
}

impl Default for ZoneTemplate {
    fn default() -> Self {
        Self {
            count: 0,
            extent: 40.0,
            radius: 1.0,
            effect: ZoneEffect::new(),
        }
    }
}

impl ZoneTemplate {
    /// Zone description at a fixed position
    pub fn at(&self, kind: ZoneKind, position: Vec3) -> ZoneSpec {
        ZoneSpec {
            kind,
            position,
            radius: self.radius,
            effect: self.effect.clone(),
            mode: match kind {
                ZoneKind::Collectible => TriggerMode::Once,
                ZoneKind::Healing | ZoneKind::Meditation => TriggerMode::EveryTick,
            },
        }
    }

    /// Scatter `count` zones uniformly over the template's extent
    pub fn scatter(
        &self,
        kind: ZoneKind,
        rng: &mut impl Rng,
        height_fn: impl Fn(f32, f32) -> f32,
    ) -> Vec<ZoneSpec> {
        let extent = self.extent.max(0.0);
        (0..self.count)
            .map(|_| {
                let x = rng.gen_range(-extent..=extent);
                let z = rng.gen_range(-extent..=extent);
                self.at(kind, Vec3::new(x, height_fn(x, z), z))
            })
            .collect()
    }
}

/// Zones placed when the world is built
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneLayout {
    pub healing: ZoneTemplate,
    pub meditation: ZoneTemplate,
    pub flowers: ZoneTemplate,
}

impl Default for ZoneLayout {
    fn default() -> Self {
        Self {
            healing: ZoneTemplate {
                count: 5,
                extent: 40.0,
                radius: 2.0,
                effect: ZoneEffect::new().with(LedgerOp::Heal, 0.1),
            },
            meditation: ZoneTemplate {
                count: 3,
                extent: 30.0,
                radius: 3.0,
                effect: ZoneEffect::new()
                    .with(LedgerOp::Heal, 0.1)
                    .with(LedgerOp::RestoreEnergy, 0.2)
                    .with(LedgerOp::AddExperience, 0.1)
                    .with(LedgerOp::HealingProgress, 0.005)
                    .with(LedgerOp::MeditationTime, 0.01),
            },
            flowers: ZoneTemplate {
                count: 50,
                extent: 40.0,
                radius: 1.5,
                effect: ZoneEffect::new().with(LedgerOp::AddExperience, 5.0),
            },
        }
    }
}
