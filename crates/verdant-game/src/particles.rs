//! Particle playback: ambient rings around zones and level-up bursts

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use verdant_core::EntityId;

use crate::zone::ZoneId;

/// Particle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Particles orbiting each healing or meditation zone
    pub ring_particles: usize,
    /// Ring rotation per tick, in radians
    pub ring_spin: f32,
    /// Bob height around `bob_center`
    pub bob_amplitude: f32,
    /// Bob phase speed in radians per second
    pub bob_frequency: f32,
    pub bob_center: f32,
    /// Particles in a level-up burst
    pub burst_particles: usize,
    /// Seconds a burst stays in the scene
    pub burst_lifetime: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            ring_particles: 20,
            ring_spin: 0.01,
            bob_amplitude: 0.5,
            bob_frequency: 3.0,
            bob_center: 1.0,
            burst_particles: 20,
            burst_lifetime: 1.0,
        }
    }
}

/// Particles circling a zone
#[derive(Debug, Clone)]
pub struct ParticleRing {
    pub zone: ZoneId,
    pub handle: EntityId,
    pub center: Vec3,
    /// Current ring rotation
    pub spin: f32,
    /// Particle offsets from the center; y is the bob height
    pub offsets: Vec<Vec3>,
}

/// A short-lived burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub handle: EntityId,
    pub position: Vec3,
    pub spawned_at: f64,
}

/// Every particle effect in the world
#[derive(Debug, Clone, Default)]
pub struct ParticleEffects {
    pub config: ParticleConfig,
    rings: Vec<ParticleRing>,
    bursts: Vec<Burst>,
}

impl ParticleEffects {
    pub fn new(config: ParticleConfig) -> Self {
        Self {
            config,
            rings: Vec::new(),
            bursts: Vec::new(),
        }
    }

    /// Attach a ring of particles around a zone
    pub fn add_ring(&mut self, zone: ZoneId, center: Vec3, radius: f32, rng: &mut impl Rng) {
        let offsets = (0..self.config.ring_particles)
            .map(|i| {
                let angle = i as f32 / self.config.ring_particles as f32 * TAU;
                let r = radius * rng.gen_range(0.5..=1.0);
                Vec3::new(angle.cos() * r, rng.gen_range(0.0..2.0), angle.sin() * r)
            })
            .collect();

        self.rings.push(ParticleRing {
            zone,
            handle: EntityId::new(),
            center,
            spin: 0.0,
            offsets,
        });
    }

    /// Start a burst and return its handle
    pub fn spawn_burst(&mut self, position: Vec3, now: f64) -> EntityId {
        let handle = EntityId::new();
        self.bursts.push(Burst {
            handle,
            position,
            spawned_at: now,
        });
        handle
    }

    /// Returns false if the burst was already removed
    pub fn remove_burst(&mut self, handle: EntityId) -> bool {
        let before = self.bursts.len();
        self.bursts.retain(|b| b.handle != handle);
        self.bursts.len() != before
    }

    /// Spin every ring and bob its particles
    pub fn update(&mut self, elapsed: f32) {
        let config = &self.config;
        for ring in &mut self.rings {
            ring.spin = (ring.spin + config.ring_spin) % TAU;
            for offset in &mut ring.offsets {
                offset.y = (elapsed * config.bob_frequency + offset.x).sin()
                    * config.bob_amplitude
                    + config.bob_center;
            }
        }
    }

    pub fn rings(&self) -> &[ParticleRing] {
        &self.rings
    }

    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_ring_spins_and_bobs() {
        let mut effects = ParticleEffects::default();
        effects.add_ring(ZoneId(1), Vec3::ZERO, 2.0, &mut StdRng::seed_from_u64(7));
        assert_eq!(effects.rings()[0].offsets.len(), 20);

        effects.update(1.0);
        effects.update(1.0);
        let ring = &effects.rings()[0];
        assert!((ring.spin - 0.02).abs() < 1e-6);
        for offset in &ring.offsets {
            assert!(offset.y >= 0.5 - 1e-6 && offset.y <= 1.5 + 1e-6);
            assert!((offset.y - ((3.0 + offset.x).sin() * 0.5 + 1.0)).abs() < 1e-6);
            assert!(offset.x.hypot(offset.z) <= 2.0 + 1e-5);
        }
    }

    #[test]
    fn test_burst_lifecycle() {
        let mut effects = ParticleEffects::default();
        let handle = effects.spawn_burst(Vec3::ONE, 2.0);
        assert_eq!(effects.bursts().len(), 1);
        assert_eq!(effects.bursts()[0].spawned_at, 2.0);

        assert!(effects.remove_burst(handle));
        assert!(!effects.remove_burst(handle));
        assert!(effects.bursts().is_empty());
    }
}
