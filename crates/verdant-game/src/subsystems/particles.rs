//! Particle playback

use crate::events::{SceneCommand, WorldEvent};
use crate::particles::ParticleEffects;
use crate::subsystem::{borrow_state, Shared, Subsystem, SubsystemError, TickContext};

/// Animates zone rings and removes expired bursts
pub struct ParticlePlayback {
    effects: Shared<ParticleEffects>,
}

impl ParticlePlayback {
    pub fn new(effects: Shared<ParticleEffects>) -> Self {
        Self { effects }
    }
}

impl Subsystem for ParticlePlayback {
    fn name(&self) -> &str {
        "particles"
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), SubsystemError> {
        borrow_state(&self.effects, "particles")?.update(ctx.clock.elapsed_f32());
        Ok(())
    }

    fn handle_event(
        &mut self,
        event: &WorldEvent,
        ctx: &mut TickContext,
    ) -> Result<(), SubsystemError> {
        if let WorldEvent::RemoveBurst(handle) = event {
            if borrow_state(&self.effects, "particles")?.remove_burst(*handle) {
                ctx.commands.push(SceneCommand::Remove(*handle));
            }
        }
        Ok(())
    }
}
