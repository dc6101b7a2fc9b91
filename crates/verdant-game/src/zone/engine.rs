//! Proximity trigger engine

use glam::Vec3;
use tracing::debug;
use verdant_core::EntityId;

use super::{TriggerMode, Zone, ZoneId, ZoneKind, ZoneSpec};
use crate::progression::ProgressionLedger;

/// Distance on the ground plane, ignoring height
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Outcome of one evaluation
#[derive(Debug, Clone, Default)]
pub struct ProximityReport {
    /// Zones whose effect was applied
    pub fired: Vec<(ZoneId, ZoneKind)>,
    /// One-shot zones that fired and were removed
    pub collected: Vec<Zone>,
    /// Whether any meditation zone is occupied
    pub meditating: bool,
    /// Whether any healing zone is occupied
    pub in_healing_zone: bool,
    /// Number of level-ups caused by zone effects
    pub level_ups: u32,
}

impl ProximityReport {
    pub fn fired_count(&self, kind: ZoneKind) -> usize {
        self.fired.iter().filter(|(_, k)| *k == kind).count()
    }
}

/// Evaluates every live zone against the player position
#[derive(Debug, Default)]
pub struct ProximityTriggerEngine {
    zones: Vec<Zone>,
    next_id: u64,
}

impl ProximityTriggerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone and return its id
    pub fn add(&mut self, spec: ZoneSpec) -> ZoneId {
        self.next_id += 1;
        let id = ZoneId(self.next_id);
        self.zones.push(Zone {
            id,
            kind: spec.kind,
            position: spec.position,
            radius: spec.radius,
            effect: spec.effect,
            mode: spec.mode,
            handle: EntityId::new(),
            occupied: false,
        });
        id
    }

    /// Remove a zone without firing it
    pub fn remove(&mut self, id: ZoneId) -> Option<Zone> {
        let index = self.zones.iter().position(|z| z.id == id)?;
        Some(self.zones.remove(index))
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn count_of(&self, kind: ZoneKind) -> usize {
        self.zones.iter().filter(|z| z.kind == kind).count()
    }

    /// Per-zone occupied flags for glow feedback
    pub fn active_flags(&self) -> Vec<(EntityId, bool)> {
        self.zones.iter().map(|z| (z.handle, z.occupied)).collect()
    }

    /// Apply the effect of every zone the player stands in.
    ///
    /// Overlapping zones all fire. One-shot zones are removed after firing.
    pub fn evaluate(&mut self, player: Vec3, ledger: &mut ProgressionLedger) -> ProximityReport {
        let mut report = ProximityReport::default();

        for zone in &mut self.zones {
            zone.occupied = horizontal_distance(player, zone.position) < zone.radius;
            if !zone.occupied {
                continue;
            }

            if zone.effect.apply(ledger) {
                report.level_ups += 1;
            }
            report.fired.push((zone.id, zone.kind));
            match zone.kind {
                ZoneKind::Meditation => report.meditating = true,
                ZoneKind::Healing => report.in_healing_zone = true,
                ZoneKind::Collectible => {}
            }
        }

        let mut index = 0;
        while index < self.zones.len() {
            let zone = &self.zones[index];
            if zone.mode == TriggerMode::Once && zone.occupied {
                let zone = self.zones.remove(index);
                debug!(zone = zone.id.0, kind = ?zone.kind, "One-shot zone collected");
                report.collected.push(zone);
            } else {
                index += 1;
            }
        }

        report
    }
}
