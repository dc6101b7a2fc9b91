//! Flower growth animation

use crate::flowers::FlowerBed;
use crate::subsystem::{borrow_state, Shared, Subsystem, SubsystemError, TickContext};

/// Grows and sways every planted flower
pub struct FlowerGrowth {
    bed: Shared<FlowerBed>,
}

impl FlowerGrowth {
    pub fn new(bed: Shared<FlowerBed>) -> Self {
        Self { bed }
    }
}

impl Subsystem for FlowerGrowth {
    fn name(&self) -> &str {
        "flowers"
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), SubsystemError> {
        borrow_state(&self.bed, "flowers")?.update(ctx.clock.elapsed_f32());
        Ok(())
    }
}
