//! Subsystem trait and per-tick context
//!
//! A subsystem owns one slice of world behavior (weather, vegetation, NPC
//! pathing...). It receives shared handles to the state it needs when it is
//! constructed and everything frame-specific through [`TickContext`].

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use glam::Vec3;
use verdant_core::{Clock, TimerId, TimerQueue};
use verdant_world::{TerrainError, VegetationError};

use crate::events::{GameEvent, SceneCommand, WorldEvent};

/// State shared between the world and the subsystems that need it
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value for sharing
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Errors raised by a subsystem
#[derive(Debug, thiserror::Error)]
pub enum SubsystemError {
    #[error("{0} state is already borrowed")]
    StateBusy(&'static str),

    #[error("Subsystem used before initialization")]
    NotReady,

    #[error("Terrain error: {0}")]
    Terrain(#[from] TerrainError),

    #[error("Vegetation error: {0}")]
    Vegetation(#[from] VegetationError),

    #[error("{0}")]
    Failed(String),

    #[error("Panicked: {0}")]
    Panicked(String),
}

/// Mutably borrow shared state, reporting contention as an error
pub fn borrow_state<'a, T>(
    state: &'a Shared<T>,
    what: &'static str,
) -> Result<RefMut<'a, T>, SubsystemError> {
    state
        .try_borrow_mut()
        .map_err(|_| SubsystemError::StateBusy(what))
}

/// Player facts computed by the world before subsystems run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerSnapshot {
    pub position: Vec3,
    /// Inside any meditation zone this tick
    pub meditating: bool,
    /// Inside any healing zone this tick
    pub in_healing_zone: bool,
    /// Flowers picked up this tick
    pub flowers_collected: u32,
}

/// Everything a subsystem may read or produce during one call
pub struct TickContext<'a> {
    pub clock: &'a Clock,
    pub player: PlayerSnapshot,
    pub timers: &'a mut TimerQueue<WorldEvent>,
    pub commands: &'a mut Vec<SceneCommand>,
    pub events: &'a mut Vec<GameEvent>,
}

impl TickContext<'_> {
    /// Current simulation time in seconds
    pub fn now(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn delta(&self) -> f32 {
        self.clock.delta()
    }

    /// Deliver `event` once after `delay` seconds
    pub fn schedule_after(&mut self, delay: f64, event: WorldEvent) -> TimerId {
        let now = self.now();
        self.timers.after(now, delay, event)
    }

    /// Deliver `event` every `interval` seconds
    pub fn schedule_every(&mut self, interval: f64, event: WorldEvent) -> TimerId {
        let now = self.now();
        self.timers.every(now, interval, event)
    }
}

/// One independently ticking slice of the world
pub trait Subsystem {
    /// Name used in logs and failure reports
    fn name(&self) -> &str;

    /// Called once before the first update. A failure keeps the subsystem
    /// out of every later update.
    fn initialize(&mut self, _ctx: &mut TickContext) -> Result<(), SubsystemError> {
        Ok(())
    }

    /// Called once per tick
    fn update(&mut self, ctx: &mut TickContext) -> Result<(), SubsystemError>;

    /// Called for every timer event the world delivers
    fn handle_event(
        &mut self,
        _event: &WorldEvent,
        _ctx: &mut TickContext,
    ) -> Result<(), SubsystemError> {
        Ok(())
    }
}

/// A subsystem built from a closure
pub struct FnSubsystem<F> {
    name: String,
    update: F,
}

impl<F> FnSubsystem<F>
where
    F: FnMut(&mut TickContext) -> Result<(), SubsystemError>,
{
    pub fn new(name: impl Into<String>, update: F) -> Self {
        Self {
            name: name.into(),
            update,
        }
    }
}

impl<F> Subsystem for FnSubsystem<F>
where
    F: FnMut(&mut TickContext) -> Result<(), SubsystemError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), SubsystemError> {
        (self.update)(ctx)
    }
}
