//! Terrain bookkeeping

use verdant_world::{Terrain, TerrainConfig};

use crate::subsystem::{borrow_state, Shared, Subsystem, SubsystemError, TickContext};

/// Ground facts under the player
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroundSample {
    /// Terrain height below the player
    pub height: f32,
    /// Whether the player is over the generated grid
    pub on_terrain: bool,
}

/// Generates the heightfield and samples it under the player each tick
pub struct TerrainTracker {
    config: TerrainConfig,
    terrain: Option<Terrain>,
    ground: Shared<GroundSample>,
}

impl TerrainTracker {
    pub fn new(config: TerrainConfig, ground: Shared<GroundSample>) -> Self {
        Self {
            config,
            terrain: None,
            ground,
        }
    }
}

impl Subsystem for TerrainTracker {
    fn name(&self) -> &str {
        "terrain"
    }

    fn initialize(&mut self, _ctx: &mut TickContext) -> Result<(), SubsystemError> {
        self.terrain = Some(Terrain::generate(self.config.clone())?);
        Ok(())
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), SubsystemError> {
        let terrain = self.terrain.as_ref().ok_or(SubsystemError::NotReady)?;
        let position = ctx.player.position;

        let mut ground = borrow_state(&self.ground, "ground")?;
        ground.height = terrain.height_at(position.x, position.z);
        ground.on_terrain = terrain.contains(position.x, position.z);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use verdant_world::TerrainError;

    use super::*;
    use crate::subsystem::shared;
    use crate::subsystems::testing::Harness;

    #[test]
    fn test_tracks_ground_under_player() {
        let ground = shared(GroundSample::default());
        let config = TerrainConfig::default();
        let mut tracker = TerrainTracker::new(config.clone(), ground.clone());
        let mut harness = Harness::new();

        assert!(matches!(
            tracker.update(&mut harness.ctx()),
            Err(SubsystemError::NotReady)
        ));

        tracker.initialize(&mut harness.ctx()).unwrap();
        harness.player.position = Vec3::new(10.0, 0.0, 20.0);
        tracker.update(&mut harness.ctx()).unwrap();

        let sample = *ground.borrow();
        assert!(sample.on_terrain);
        assert!((sample.height - config.wave_height(10.0, 20.0)).abs() < 1e-4);

        harness.player.position = Vec3::new(500.0, 0.0, 0.0);
        tracker.update(&mut harness.ctx()).unwrap();
        assert!(!ground.borrow().on_terrain);
    }

    #[test]
    fn test_bad_config_fails_initialize() {
        let config = TerrainConfig {
            subdivisions: 0,
            ..Default::default()
        };
        let mut tracker = TerrainTracker::new(config, shared(GroundSample::default()));
        let mut harness = Harness::new();
        assert!(matches!(
            tracker.initialize(&mut harness.ctx()),
            Err(SubsystemError::Terrain(TerrainError::NoSubdivisions))
        ));
    }
}
