//! Wandering villagers

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use verdant_core::EntityId;

/// Unique identifier for an NPC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NpcId(pub u64);

/// Crowd configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    /// NPCs spawned at world build
    pub count: usize,
    /// Half-size of the square NPCs spawn and wander in
    pub extent: f32,
    /// Distance moved per tick along each axis at full swing
    pub wander_step: f32,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            count: 5,
            extent: 40.0,
            wander_step: 0.02,
        }
    }
}

/// A wandering NPC
#[derive(Debug, Clone, PartialEq)]
pub struct Npc {
    pub id: NpcId,
    /// Visual handle
    pub handle: EntityId,
    pub position: Vec3,
    /// Facing angle in radians
    pub yaw: f32,
}

/// Every NPC in the world
#[derive(Debug, Clone, Default)]
pub struct NpcCrowd {
    pub config: NpcConfig,
    npcs: Vec<Npc>,
    next_id: u64,
}

impl NpcCrowd {
    pub fn new(config: NpcConfig) -> Self {
        Self {
            config,
            npcs: Vec::new(),
            next_id: 0,
        }
    }

    /// Place an NPC and return its id
    pub fn spawn(&mut self, position: Vec3) -> NpcId {
        self.next_id += 1;
        let id = NpcId(self.next_id);
        self.npcs.push(Npc {
            id,
            handle: EntityId::new(),
            position,
            yaw: 0.0,
        });
        id
    }

    /// Place `config.count` NPCs at random positions
    pub fn populate(&mut self, rng: &mut impl Rng) {
        let extent = self.config.extent.max(0.0);
        for _ in 0..self.config.count {
            let position = Vec3::new(
                rng.gen_range(-extent..=extent),
                0.0,
                rng.gen_range(-extent..=extent),
            );
            self.spawn(position);
        }
    }

    /// Move every NPC along its wander curve
    pub fn wander(&mut self, elapsed: f32) {
        let step = self.config.wander_step;
        let extent = self.config.extent.max(0.0);
        for npc in &mut self.npcs {
            let p = npc.position;
            let dx = (elapsed + p.z).sin();
            let dz = (elapsed + p.x).cos();
            npc.position.x = (p.x + dx * step).clamp(-extent, extent);
            npc.position.z = (p.z + dz * step).clamp(-extent, extent);
            npc.yaw = dz.atan2(dx);
        }
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn get(&self, id: NpcId) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_populate_within_bounds() {
        let mut crowd = NpcCrowd::default();
        crowd.populate(&mut StdRng::seed_from_u64(1));
        assert_eq!(crowd.len(), 5);
        for npc in crowd.npcs() {
            assert!(npc.position.x.abs() <= 40.0);
            assert!(npc.position.z.abs() <= 40.0);
        }
    }

    #[test]
    fn test_wander_step() {
        let mut crowd = NpcCrowd::default();
        let id = crowd.spawn(Vec3::new(1.0, 0.0, 2.0));
        crowd.wander(0.5);

        let npc = crowd.get(id).unwrap();
        let dx = (0.5f32 + 2.0).sin();
        let dz = (0.5f32 + 1.0).cos();
        assert!((npc.position.x - (1.0 + dx * 0.02)).abs() < 1e-6);
        assert!((npc.position.z - (2.0 + dz * 0.02)).abs() < 1e-6);
        assert!((npc.yaw - dz.atan2(dx)).abs() < 1e-6);
    }

    #[test]
    fn test_wander_clamped() {
        let mut crowd = NpcCrowd::default();
        let id = crowd.spawn(Vec3::new(40.0, 0.0, -40.0));
        for tick in 0..1000 {
            crowd.wander(tick as f32 * 0.016);
        }
        let npc = crowd.get(id).unwrap();
        assert!(npc.position.x.abs() <= 40.0);
        assert!(npc.position.z.abs() <= 40.0);
    }

    #[test]
    fn test_negative_extent_pins_to_origin() {
        let mut crowd = NpcCrowd::new(NpcConfig {
            extent: -10.0,
            ..Default::default()
        });
        crowd.populate(&mut StdRng::seed_from_u64(3));
        crowd.wander(1.0);
        for npc in crowd.npcs() {
            assert_eq!(npc.position.x, 0.0);
            assert_eq!(npc.position.z, 0.0);
        }
    }
}
