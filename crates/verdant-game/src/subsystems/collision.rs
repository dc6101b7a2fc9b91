//! Player/NPC contact bookkeeping

use std::collections::HashSet;

use tracing::debug;

use crate::events::GameEvent;
use crate::npc::{NpcCrowd, NpcId};
use crate::subsystem::{borrow_state, Shared, Subsystem, SubsystemError, TickContext};
use crate::zone::horizontal_distance;

/// Tracks which NPCs the player is touching and reports new contacts
pub struct CollisionTracker {
    crowd: Shared<NpcCrowd>,
    contact_radius: f32,
    contacts: HashSet<NpcId>,
}

impl CollisionTracker {
    pub fn new(crowd: Shared<NpcCrowd>, contact_radius: f32) -> Self {
        Self {
            crowd,
            contact_radius,
            contacts: HashSet::new(),
        }
    }

    pub fn is_touching(&self, npc: NpcId) -> bool {
        self.contacts.contains(&npc)
    }
}

impl Subsystem for CollisionTracker {
    fn name(&self) -> &str {
        "collision"
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), SubsystemError> {
        let crowd = borrow_state(&self.crowd, "npcs")?;
        let player = ctx.player.position;

        let touching: HashSet<NpcId> = crowd
            .npcs()
            .iter()
            .filter(|npc| horizontal_distance(player, npc.position) < self.contact_radius)
            .map(|npc| npc.id)
            .collect();

        for npc in touching.difference(&self.contacts) {
            debug!(npc = npc.0, "Contact began");
            ctx.events.push(GameEvent::NpcEncounter { npc: *npc });
        }
        self.contacts = touching;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::subsystem::shared;
    use crate::subsystems::testing::Harness;

    #[test]
    fn test_encounter_on_contact_start_only() {
        let crowd = shared(NpcCrowd::default());
        let id = crowd.borrow_mut().spawn(Vec3::new(5.0, 0.0, 0.0));
        let mut tracker = CollisionTracker::new(crowd, 1.0);
        let mut harness = Harness::new();

        tracker.update(&mut harness.ctx()).unwrap();
        assert!(harness.events.is_empty());

        harness.player.position = Vec3::new(4.5, 0.0, 0.0);
        tracker.update(&mut harness.ctx()).unwrap();
        tracker.update(&mut harness.ctx()).unwrap();
        assert_eq!(harness.events, vec![GameEvent::NpcEncounter { npc: id }]);
        assert!(tracker.is_touching(id));

        harness.player.position = Vec3::ZERO;
        tracker.update(&mut harness.ctx()).unwrap();
        assert!(!tracker.is_touching(id));

        harness.player.position = Vec3::new(4.5, 0.0, 0.0);
        tracker.update(&mut harness.ctx()).unwrap();
        assert_eq!(harness.events.len(), 2);
    }
}
