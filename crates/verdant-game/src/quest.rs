//! Quest log
//!
//! Quests are lists of counted objectives. Progress is recorded from
//! gameplay events; once every objective is met the quest moves to the
//! completed set and its reward is paid through the ledger.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::progression::ProgressionLedger;

/// Unique identifier for a quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestId(pub u32);

/// What an objective counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectiveKind {
    /// Flowers picked up
    CollectFlowers,
    /// Ticks spent inside a meditation zone
    MeditateTicks,
    /// Highest level reached
    ReachLevel,
    /// Ticks spent inside a healing zone
    VisitHealingZone,
}

/// A counted goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub kind: ObjectiveKind,
    pub target: u32,
    #[serde(default)]
    pub current: u32,
}

impl Objective {
    pub fn new(kind: ObjectiveKind, target: u32) -> Self {
        Self {
            kind,
            target,
            current: 0,
        }
    }

    pub fn is_met(&self) -> bool {
        self.current >= self.target
    }
}

/// Paid once when a quest completes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub experience: f32,
    pub skill_points: u32,
}

/// A quest definition with its progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub title: String,
    pub objectives: Vec<Objective>,
    pub reward: Reward,
}

impl Quest {
    pub fn new(id: u32, title: impl Into<String>, reward: Reward) -> Self {
        Self {
            id: QuestId(id),
            title: title.into(),
            objectives: Vec::new(),
            reward,
        }
    }

    pub fn with_objective(mut self, kind: ObjectiveKind, target: u32) -> Self {
        self.objectives.push(Objective::new(kind, target));
        self
    }

    pub fn is_complete(&self) -> bool {
        self.objectives.iter().all(Objective::is_met)
    }
}

/// Quests offered at the start of a session
pub fn default_quests() -> Vec<Quest> {
    vec![
        Quest::new(
            1,
            "First Blossoms",
            Reward {
                experience: 20.0,
                skill_points: 0,
            },
        )
        .with_objective(ObjectiveKind::CollectFlowers, 5),
        Quest::new(
            2,
            "Still Mind",
            Reward {
                experience: 30.0,
                skill_points: 1,
            },
        )
        .with_objective(ObjectiveKind::MeditateTicks, 600),
        Quest::new(
            3,
            "Sanctuary",
            Reward {
                experience: 10.0,
                skill_points: 0,
            },
        )
        .with_objective(ObjectiveKind::VisitHealingZone, 60),
        Quest::new(
            4,
            "Growing Stronger",
            Reward {
                experience: 0.0,
                skill_points: 2,
            },
        )
        .with_objective(ObjectiveKind::ReachLevel, 3),
    ]
}

/// Active and completed quests, always disjoint
#[derive(Debug, Clone, Default)]
pub struct QuestLog {
    active: Vec<Quest>,
    completed: Vec<Quest>,
}

impl QuestLog {
    pub fn new(quests: Vec<Quest>) -> Self {
        Self {
            active: quests,
            completed: Vec::new(),
        }
    }

    /// Add to every active objective of `kind`
    pub fn record(&mut self, kind: ObjectiveKind, amount: u32) {
        for objective in self
            .active
            .iter_mut()
            .flat_map(|q| q.objectives.iter_mut())
            .filter(|o| o.kind == kind)
        {
            objective.current = objective.current.saturating_add(amount);
        }
    }

    /// Raise level objectives to the player's level, never lowering them
    pub fn observe_level(&mut self, level: u32) {
        for objective in self
            .active
            .iter_mut()
            .flat_map(|q| q.objectives.iter_mut())
            .filter(|o| o.kind == ObjectiveKind::ReachLevel)
        {
            objective.current = objective.current.max(level);
        }
    }

    /// Move finished quests to the completed set, paying each reward once.
    ///
    /// Returns the quests completed by this call.
    pub fn complete_ready(&mut self, ledger: &mut ProgressionLedger) -> Vec<(QuestId, String)> {
        let mut finished = Vec::new();
        let mut index = 0;
        while index < self.active.len() {
            if !self.active[index].is_complete() {
                index += 1;
                continue;
            }

            let quest = self.active.remove(index);
            info!(quest = %quest.title, "Quest completed");
            if quest.reward.experience > 0.0 {
                ledger.add_experience(quest.reward.experience);
            }
            ledger.grant_skill_points(quest.reward.skill_points);
            finished.push((quest.id, quest.title.clone()));
            self.completed.push(quest);
        }
        finished
    }

    pub fn active(&self) -> &[Quest] {
        &self.active
    }

    pub fn completed(&self) -> &[Quest] {
        &self.completed
    }

    pub fn is_active(&self, id: QuestId) -> bool {
        self.active.iter().any(|q| q.id == id)
    }

    pub fn is_completed(&self, id: QuestId) -> bool {
        self.completed.iter().any(|q| q.id == id)
    }
}
