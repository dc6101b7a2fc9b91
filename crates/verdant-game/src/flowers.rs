//! Collectible flowers
//!
//! A flower's pickup behavior lives in its collectible zone. This module
//! tracks the visual side: growth from bud to bloom and the gentle sway.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use verdant_core::EntityId;

use crate::zone::ZoneId;

/// Flower animation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerConfig {
    /// Growth gained per tick, until fully grown
    pub growth_rate: f32,
    /// Peak sway yaw in radians
    pub sway_amplitude: f32,
}

impl Default for FlowerConfig {
    fn default() -> Self {
        Self {
            growth_rate: 0.01,
            sway_amplitude: 0.1,
        }
    }
}

/// A flower that can be picked up once
#[derive(Debug, Clone, PartialEq)]
pub struct CollectibleFlower {
    /// Pickup zone
    pub zone: ZoneId,
    /// Visual handle
    pub handle: EntityId,
    pub position: Vec3,
    /// 0.0 (bud) to 1.0 (bloom)
    pub growth: f32,
    /// Current sway yaw
    pub sway: f32,
    pub alive: bool,
}

/// Every flower placed in the world
#[derive(Debug, Clone, Default)]
pub struct FlowerBed {
    pub config: FlowerConfig,
    flowers: Vec<CollectibleFlower>,
}

impl FlowerBed {
    pub fn new(config: FlowerConfig) -> Self {
        Self {
            config,
            flowers: Vec::new(),
        }
    }

    pub fn plant(&mut self, zone: ZoneId, handle: EntityId, position: Vec3) {
        self.flowers.push(CollectibleFlower {
            zone,
            handle,
            position,
            growth: 0.0,
            sway: 0.0,
            alive: true,
        });
    }

    /// Advance growth and sway. Growth continues for collected flowers.
    pub fn update(&mut self, elapsed: f32) {
        let rate = self.config.growth_rate.max(0.0);
        let amplitude = self.config.sway_amplitude;
        for flower in &mut self.flowers {
            flower.growth = (flower.growth + rate).min(1.0);
            flower.sway = (elapsed + flower.position.x).sin() * amplitude;
        }
    }

    /// Mark the flower behind a zone as picked. Returns false if unknown or already picked.
    pub fn collect(&mut self, zone: ZoneId) -> bool {
        match self.flowers.iter_mut().find(|f| f.zone == zone) {
            Some(flower) if flower.alive => {
                flower.alive = false;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, zone: ZoneId) -> Option<&CollectibleFlower> {
        self.flowers.iter().find(|f| f.zone == zone)
    }

    pub fn flowers(&self) -> &[CollectibleFlower] {
        &self.flowers
    }

    pub fn alive_count(&self) -> usize {
        self.flowers.iter().filter(|f| f.alive).count()
    }

    pub fn len(&self) -> usize {
        self.flowers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flowers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_caps_at_bloom() {
        let mut bed = FlowerBed::default();
        bed.plant(ZoneId(1), EntityId::new(), Vec3::new(2.0, 0.0, 3.0));

        bed.update(0.0);
        assert!((bed.flowers()[0].growth - 0.01).abs() < 1e-6);

        for _ in 0..200 {
            bed.update(0.5);
        }
        assert_eq!(bed.flowers()[0].growth, 1.0);
        assert!((bed.flowers()[0].sway - (0.5f32 + 2.0).sin() * 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_collect_once() {
        let mut bed = FlowerBed::default();
        bed.plant(ZoneId(1), EntityId::new(), Vec3::ZERO);
        bed.plant(ZoneId(2), EntityId::new(), Vec3::ZERO);

        assert!(bed.collect(ZoneId(1)));
        assert!(!bed.collect(ZoneId(1)));
        assert!(!bed.collect(ZoneId(9)));
        assert_eq!(bed.alive_count(), 1);
        assert!(!bed.get(ZoneId(1)).unwrap().alive);
    }

    #[test]
    fn test_growth_continues_after_collection() {
        let mut bed = FlowerBed::default();
        bed.plant(ZoneId(1), EntityId::new(), Vec3::ZERO);
        bed.collect(ZoneId(1));
        bed.update(0.0);
        assert!(bed.flowers()[0].growth > 0.0);
    }
}
