//! Quest tracking

use crate::events::GameEvent;
use crate::progression::ProgressionLedger;
use crate::quest::{ObjectiveKind, QuestLog};
use crate::subsystem::{borrow_state, Shared, Subsystem, SubsystemError, TickContext};

/// Records objective progress from the player snapshot and completes quests
pub struct QuestTracker {
    log: Shared<QuestLog>,
    ledger: Shared<ProgressionLedger>,
}

impl QuestTracker {
    pub fn new(log: Shared<QuestLog>, ledger: Shared<ProgressionLedger>) -> Self {
        Self { log, ledger }
    }
}

impl Subsystem for QuestTracker {
    fn name(&self) -> &str {
        "quests"
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), SubsystemError> {
        let mut log = borrow_state(&self.log, "quests")?;
        let mut ledger = borrow_state(&self.ledger, "ledger")?;
        let player = ctx.player;

        if player.flowers_collected > 0 {
            log.record(ObjectiveKind::CollectFlowers, player.flowers_collected);
        }
        if player.meditating {
            log.record(ObjectiveKind::MeditateTicks, 1);
        }
        if player.in_healing_zone {
            log.record(ObjectiveKind::VisitHealingZone, 1);
        }
        log.observe_level(ledger.level());

        for (id, title) in log.complete_ready(&mut ledger) {
            ctx.events.push(GameEvent::QuestCompleted { id, title });
        }
        Ok(())
    }
}
