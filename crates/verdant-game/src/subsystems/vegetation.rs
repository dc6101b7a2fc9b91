//! Vegetation growth

use tracing::{debug, info, trace};
use verdant_world::{TerrainConfig, VegetationField};

use crate::subsystem::{borrow_state, Shared, Subsystem, SubsystemError, TickContext};

/// Populates the vegetation field and advances it every tick
pub struct VegetationGrowth {
    field: Shared<VegetationField>,
    ground: TerrainConfig,
    total_grown: u64,
}

impl VegetationGrowth {
    /// `ground` supplies the height instances are planted at
    pub fn new(field: Shared<VegetationField>, ground: TerrainConfig) -> Self {
        Self {
            field,
            ground,
            total_grown: 0,
        }
    }

    /// Instance growth steps applied since initialization
    pub fn total_grown(&self) -> u64 {
        self.total_grown
    }
}

impl Subsystem for VegetationGrowth {
    fn name(&self) -> &str {
        "vegetation"
    }

    fn initialize(&mut self, _ctx: &mut TickContext) -> Result<(), SubsystemError> {
        let mut field = borrow_state(&self.field, "vegetation")?;
        let ground = &self.ground;
        let count = field.populate(|x, z| ground.wave_height(x, z))?;
        info!(instances = count, "Vegetation planted");
        Ok(())
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), SubsystemError> {
        let mut field = borrow_state(&self.field, "vegetation")?;
        let tick = field.tick(
            ctx.clock.elapsed_f32(),
            ctx.player.position,
            ctx.player.meditating,
        );

        self.total_grown += tick.grown as u64;
        if tick.grown > 0 || tick.brightened > 0 {
            trace!(grown = tick.grown, brightened = tick.brightened, "Vegetation tick");
        }
        if ctx.clock.ticks() % 600 == 0 {
            debug!(
                average_height = field.average_height(),
                total_grown = self.total_grown,
                "Vegetation status"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use verdant_world::{VegetationConfig, VegetationError};

    use super::*;
    use crate::subsystem::shared;
    use crate::subsystems::testing::Harness;

    fn small() -> VegetationConfig {
        VegetationConfig {
            instance_count: 300,
            ..Default::default()
        }
    }

    #[test]
    fn test_initialize_plants_on_terrain() {
        let field = shared(VegetationField::empty(small()));
        let ground = TerrainConfig::default();
        let mut growth = VegetationGrowth::new(field.clone(), ground.clone());
        let mut harness = Harness::new();

        growth.initialize(&mut harness.ctx()).unwrap();
        let field = field.borrow();
        assert_eq!(field.len(), 300);
        let instance = field.instance(0).unwrap();
        let expected = ground.wave_height(instance.position.x, instance.position.z);
        assert!((instance.position.y - expected).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_config_fails_initialize() {
        let field = shared(VegetationField::empty(VegetationConfig {
            cluster_size: 0,
            ..small()
        }));
        let mut growth = VegetationGrowth::new(field, TerrainConfig::default());
        let mut harness = Harness::new();

        assert!(matches!(
            growth.initialize(&mut harness.ctx()),
            Err(SubsystemError::Vegetation(VegetationError::EmptyClusters))
        ));
    }

    #[test]
    fn test_update_grows_near_player() {
        let field = shared(VegetationField::empty(small()));
        let mut growth = VegetationGrowth::new(field.clone(), TerrainConfig::default());
        let mut harness = Harness::new();
        growth.initialize(&mut harness.ctx()).unwrap();

        let target = field.borrow().instance(0).unwrap();
        harness.player.position = target.position + Vec3::new(0.0, 5.0, 0.0);
        harness.player.meditating = true;
        harness.advance(0.016);
        growth.update(&mut harness.ctx()).unwrap();

        assert!(growth.total_grown() >= 1);
        let rate = field.borrow().config.growth_rate;
        let grown = field.borrow().instance(0).unwrap().height;
        assert!((grown - (target.height + rate * 2.0)).abs() < 1e-6);
    }
}
