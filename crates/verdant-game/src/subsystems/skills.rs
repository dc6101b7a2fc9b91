//! Skill unlocks

use crate::progression::{ProgressionLedger, SkillUnlock};
use crate::subsystem::{borrow_state, Shared, Subsystem, SubsystemError, TickContext};

/// Teaches catalog skills once the player reaches their unlock level
pub struct SkillTracker {
    ledger: Shared<ProgressionLedger>,
    pending: Vec<SkillUnlock>,
}

impl SkillTracker {
    pub fn new(ledger: Shared<ProgressionLedger>, catalog: Vec<SkillUnlock>) -> Self {
        Self {
            ledger,
            pending: catalog,
        }
    }

    /// Skills not yet unlocked
    pub fn pending(&self) -> &[SkillUnlock] {
        &self.pending
    }
}

impl Subsystem for SkillTracker {
    fn name(&self) -> &str {
        "skills"
    }

    fn update(&mut self, _ctx: &mut TickContext) -> Result<(), SubsystemError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let mut ledger = borrow_state(&self.ledger, "ledger")?;
        let level = ledger.level();
        let (ready, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|unlock| unlock.unlock_level <= level);
        self.pending = pending;

        // The ledger announces each learned skill through its own events
        for unlock in ready {
            ledger.register_skill(unlock.skill);
        }
        Ok(())
    }
}
