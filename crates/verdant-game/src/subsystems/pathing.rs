//! NPC wandering

use crate::npc::NpcCrowd;
use crate::subsystem::{borrow_state, Shared, Subsystem, SubsystemError, TickContext};

/// Moves every NPC along its wander curve
pub struct NpcPathing {
    crowd: Shared<NpcCrowd>,
}

impl NpcPathing {
    pub fn new(crowd: Shared<NpcCrowd>) -> Self {
        Self { crowd }
    }
}

impl Subsystem for NpcPathing {
    fn name(&self) -> &str {
        "npc-pathing"
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), SubsystemError> {
        borrow_state(&self.crowd, "npcs")?.wander(ctx.clock.elapsed_f32());
        Ok(())
    }
}
