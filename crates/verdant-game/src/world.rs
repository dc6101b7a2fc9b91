//! World composition root
//!
//! Owns the clock, the player, every zone and entity collection, the timer
//! queue, and the subsystem scheduler. One call to [`World::tick`] runs a
//! whole frame:
//!
//! 1. advance the clock and the player
//! 2. deliver due timer events
//! 3. evaluate proximity zones against the player
//! 4. run every subsystem
//! 5. turn progression events into scene effects
//! 6. hand the frame to the [`FrameSink`]

use std::cell::{Ref, RefMut};

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};
use verdant_core::{Clock, EntityId, TimerId, TimerQueue};
use verdant_world::{Environment, VegetationField};

use crate::config::WorldConfig;
use crate::events::{GameEvent, Lighting, SceneCommand, WorldEvent};
use crate::flowers::FlowerBed;
use crate::npc::NpcCrowd;
use crate::particles::ParticleEffects;
use crate::player::{PlayerInput, PlayerState};
use crate::progression::{ProgressionEvent, ProgressionLedger, SkillError};
use crate::quest::QuestLog;
use crate::scheduler::{SchedulerReport, SubsystemScheduler};
use crate::subsystem::{shared, PlayerSnapshot, Shared, Subsystem, TickContext};
use crate::subsystems::{
    CollisionTracker, DayNightCycle, FlowerGrowth, GroundSample, NpcPathing, ParticlePlayback,
    QuestTracker, SkillTracker, TerrainTracker, VegetationGrowth, WeatherCycle,
};
use crate::zone::{ProximityTriggerEngine, Zone, ZoneId, ZoneKind, ZoneSpec};

/// Values shown on the HUD
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub health: f32,
    pub energy: f32,
    pub experience: f32,
    pub experience_to_next_level: f32,
    /// Experience bar fill, 0.0-1.0
    pub experience_fraction: f32,
    pub level: u32,
    pub skill_points: u32,
    pub weather: String,
    /// `HH:MM`
    pub time: String,
    pub healing_progress: f32,
    pub meditating: bool,
    /// Level shown on the banner while it is visible
    pub banner: Option<u32>,
}

/// Everything the renderer needs for one frame
#[derive(Debug)]
pub struct Frame<'a> {
    pub tick: u64,
    pub elapsed: f64,
    pub player: PlayerState,
    pub hud: HudSnapshot,
    pub lighting: Lighting,
    /// Live zones with their occupied flags
    pub zones: &'a [Zone],
    pub commands: &'a [SceneCommand],
    pub events: &'a [GameEvent],
}

/// Render collaborator, called exactly once per tick
pub trait FrameSink {
    fn render(&mut self, frame: &Frame);
}

/// Summary of one tick
#[derive(Debug, Default)]
pub struct TickReport {
    pub tick: u64,
    pub rendered: bool,
    /// Subsystem calls made this tick, including timer deliveries
    pub scheduler: SchedulerReport,
    pub level_ups: u32,
    pub flowers_collected: u32,
}

/// The simulated world
pub struct World {
    pub config: WorldConfig,
    clock: Clock,
    player: PlayerState,
    rng: StdRng,
    ledger: Shared<ProgressionLedger>,
    zones: ProximityTriggerEngine,
    environment: Shared<Environment>,
    vegetation: Shared<VegetationField>,
    flowers: Shared<FlowerBed>,
    quests: Shared<QuestLog>,
    npcs: Shared<NpcCrowd>,
    particles: Shared<ParticleEffects>,
    ground: Shared<GroundSample>,
    timers: TimerQueue<WorldEvent>,
    scheduler: SubsystemScheduler,
    snapshot: PlayerSnapshot,
    commands: Vec<SceneCommand>,
    events: Vec<GameEvent>,
    banner: Option<(u32, TimerId)>,
    started: bool,
    stopped: bool,
}

impl World {
    /// A world with every zone, NPC, and built-in subsystem
    pub fn new(config: WorldConfig) -> Self {
        let mut world = Self::empty(config);
        world.populate();
        world.register_default_subsystems();
        world
    }

    /// A world with state but no zones, NPCs, or subsystems
    pub fn empty(config: WorldConfig) -> Self {
        Self {
            clock: Clock::new(config.time.clone()),
            player: PlayerState::default(),
            rng: StdRng::seed_from_u64(config.seed),
            ledger: shared(ProgressionLedger::new(config.progression.clone())),
            zones: ProximityTriggerEngine::new(),
            environment: shared(Environment::new(config.environment.clone())),
            vegetation: shared(VegetationField::empty(config.vegetation.clone())),
            flowers: shared(FlowerBed::new(config.flowers.clone())),
            quests: shared(QuestLog::new(config.quests.clone())),
            npcs: shared(NpcCrowd::new(config.npcs.clone())),
            particles: shared(ParticleEffects::new(config.particles.clone())),
            ground: shared(GroundSample::default()),
            timers: TimerQueue::new(),
            scheduler: SubsystemScheduler::new(),
            snapshot: PlayerSnapshot::default(),
            commands: Vec::new(),
            events: Vec::new(),
            banner: None,
            started: false,
            stopped: false,
            config,
        }
    }

    fn populate(&mut self) {
        let ground = self.config.terrain.clone();
        let height = |x: f32, z: f32| ground.wave_height(x, z);
        let layout = self.config.zones.clone();

        let specs = [
            layout.healing.scatter(ZoneKind::Healing, &mut self.rng, height),
            layout
                .meditation
                .scatter(ZoneKind::Meditation, &mut self.rng, height),
            layout
                .flowers
                .scatter(ZoneKind::Collectible, &mut self.rng, height),
        ];
        for spec in specs.into_iter().flatten() {
            self.add_zone(spec);
        }

        self.npcs.borrow_mut().populate(&mut self.rng);

        info!(
            zones = self.zones.len(),
            npcs = self.npcs.borrow().len(),
            "World populated"
        );
    }

    /// Register the built-in subsystems in their tick order
    pub fn register_default_subsystems(&mut self) {
        let config = &self.config;
        let catalog = config.progression.unlockable_skills.clone();

        self.scheduler.add(TerrainTracker::new(
            config.terrain.clone(),
            self.ground.clone(),
        ));
        self.scheduler.add(WeatherCycle::new(
            self.environment.clone(),
            config.seed.wrapping_add(1),
        ));
        self.scheduler
            .add(DayNightCycle::new(self.environment.clone()));
        self.scheduler.add(VegetationGrowth::new(
            self.vegetation.clone(),
            config.terrain.clone(),
        ));
        self.scheduler.add(FlowerGrowth::new(self.flowers.clone()));
        self.scheduler
            .add(QuestTracker::new(self.quests.clone(), self.ledger.clone()));
        self.scheduler
            .add(SkillTracker::new(self.ledger.clone(), catalog));
        self.scheduler.add(CollisionTracker::new(
            self.npcs.clone(),
            config.contact_radius,
        ));
        self.scheduler.add(NpcPathing::new(self.npcs.clone()));
        self.scheduler
            .add(ParticlePlayback::new(self.particles.clone()));
    }

    /// Add a subsystem after the built-in ones
    pub fn add_subsystem<S: Subsystem + 'static>(&mut self, subsystem: S) {
        self.scheduler.add(subsystem);
    }

    /// Register a zone. Flowers are planted and restorative zones get a particle ring.
    pub fn add_zone(&mut self, spec: ZoneSpec) -> ZoneId {
        let kind = spec.kind;
        let position = spec.position;
        let radius = spec.radius;
        let id = self.zones.add(spec);
        let handle = self
            .zones
            .get(id)
            .map(|zone| zone.handle)
            .unwrap_or_default();

        match kind {
            ZoneKind::Collectible => self.flowers.borrow_mut().plant(id, handle, position),
            ZoneKind::Healing | ZoneKind::Meditation => {
                self.particles
                    .borrow_mut()
                    .add_ring(id, position, radius, &mut self.rng)
            }
        }
        id
    }

    /// Teleport the player, keeping it on the ground
    pub fn place_player(&mut self, position: Vec3) {
        self.player = PlayerState::at(position);
    }

    /// Initialize every subsystem. Called by the first tick if not called before.
    pub fn start(&mut self) -> SchedulerReport {
        self.started = true;
        let mut ctx = TickContext {
            clock: &self.clock,
            player: self.snapshot,
            timers: &mut self.timers,
            commands: &mut self.commands,
            events: &mut self.events,
        };
        let report = self.scheduler.initialize_all(&mut ctx);
        info!(
            subsystems = self.scheduler.len(),
            ready = report.initialized,
            failed = report.failures.len(),
            "World started"
        );
        report
    }

    /// Cancel every pending timer and ignore further ticks
    pub fn stop(&mut self) {
        let pending = self.timers.len();
        self.timers.clear();
        self.banner = None;
        self.stopped = true;
        info!(cancelled_timers = pending, "World stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Run one frame
    pub fn tick(
        &mut self,
        raw_delta: f32,
        input: &PlayerInput,
        sink: &mut dyn FrameSink,
    ) -> TickReport {
        if self.stopped {
            debug!("Tick ignored on a stopped world");
            return TickReport::default();
        }

        let mut report = TickReport::default();
        if !self.started {
            report.scheduler = self.start();
        }

        self.clock.advance(raw_delta);
        report.tick = self.clock.ticks();
        self.player.step(input, &self.config.movement);
        self.snapshot.position = self.player.position;

        self.deliver_timers(&mut report);

        let collected = self.evaluate_zones();
        report.flowers_collected = collected;

        let mut ctx = TickContext {
            clock: &self.clock,
            player: self.snapshot,
            timers: &mut self.timers,
            commands: &mut self.commands,
            events: &mut self.events,
        };
        let updates = self.scheduler.update_all(&mut ctx);
        report.scheduler.initialized += updates.initialized;
        report.scheduler.succeeded += updates.succeeded;
        report.scheduler.failures.extend(updates.failures);
        if !report.scheduler.is_clean() {
            warn!(
                tick = report.tick,
                failures = report.scheduler.failures.len(),
                "Subsystem failures this tick"
            );
        }

        report.level_ups = self.apply_progression_events();

        self.render(sink);
        report.rendered = true;
        report
    }

    fn deliver_timers(&mut self, report: &mut TickReport) {
        for event in self.timers.drain_due(self.clock.elapsed()) {
            if event == WorldEvent::HideLevelUpBanner {
                self.banner = None;
                self.commands.push(SceneCommand::HideLevelUpBanner);
                continue;
            }

            let mut ctx = TickContext {
                clock: &self.clock,
                player: self.snapshot,
                timers: &mut self.timers,
                commands: &mut self.commands,
                events: &mut self.events,
            };
            let delivered = self.scheduler.dispatch(&event, &mut ctx);
            report.scheduler.succeeded += delivered.succeeded;
            report.scheduler.failures.extend(delivered.failures);
        }
    }

    /// Returns the number of flowers collected
    fn evaluate_zones(&mut self) -> u32 {
        let proximity = {
            let mut ledger = self.ledger.borrow_mut();
            let proximity = self.zones.evaluate(self.player.position, &mut ledger);
            if !proximity.meditating {
                ledger.drain_energy(self.config.passive_energy_drain);
            }
            proximity
        };

        let mut collected = 0;
        for zone in &proximity.collected {
            self.commands.push(SceneCommand::Remove(zone.handle));
            if zone.kind == ZoneKind::Collectible && self.flowers.borrow_mut().collect(zone.id) {
                collected += 1;
                self.events
                    .push(GameEvent::FlowerCollected { handle: zone.handle });
            }
        }

        self.snapshot = PlayerSnapshot {
            position: self.player.position,
            meditating: proximity.meditating,
            in_healing_zone: proximity.in_healing_zone,
            flowers_collected: collected,
        };
        collected
    }

    /// Returns the number of level-ups
    fn apply_progression_events(&mut self) -> u32 {
        let pending = self.ledger.borrow_mut().take_events();
        let mut level_ups = 0;

        for event in pending {
            match event {
                ProgressionEvent::LevelUp { level } => {
                    level_ups += 1;
                    self.celebrate_level_up(level);
                    self.events.push(GameEvent::LevelUp { level });
                }
                ProgressionEvent::SkillLearned { name } => {
                    info!(skill = %name, "Skill unlocked");
                    self.events.push(GameEvent::SkillUnlocked { name });
                }
                ProgressionEvent::SkillRaised { name, level } => {
                    self.events.push(GameEvent::SkillRaised { name, level });
                }
            }
        }
        level_ups
    }

    fn celebrate_level_up(&mut self, level: u32) {
        let now = self.clock.elapsed();
        let position = self.player.position;

        let handle = self.particles.borrow_mut().spawn_burst(position, now);
        self.commands.push(SceneCommand::SpawnBurst {
            handle,
            position,
            count: self.config.particles.burst_particles,
        });
        let lifetime = f64::from(self.config.particles.burst_lifetime);
        self.timers.after(now, lifetime, WorldEvent::RemoveBurst(handle));

        if let Some((_, previous)) = self.banner.take() {
            self.timers.cancel(previous);
        }
        let timer = self
            .timers
            .after(now, self.config.banner_duration, WorldEvent::HideLevelUpBanner);
        self.banner = Some((level, timer));
        self.commands.push(SceneCommand::ShowLevelUpBanner { level });
    }

    fn render(&mut self, sink: &mut dyn FrameSink) {
        let hud = self.hud();
        let lighting = self.lighting();
        let frame = Frame {
            tick: self.clock.ticks(),
            elapsed: self.clock.elapsed(),
            player: self.player,
            hud,
            lighting,
            zones: self.zones.zones(),
            commands: &self.commands,
            events: &self.events,
        };
        sink.render(&frame);

        self.commands.clear();
        self.events.clear();
    }

    /// Current HUD values
    pub fn hud(&self) -> HudSnapshot {
        let ledger = self.ledger.borrow();
        let env = self.environment.borrow();
        HudSnapshot {
            health: ledger.health(),
            energy: ledger.energy(),
            experience: ledger.experience(),
            experience_to_next_level: ledger.experience_to_next_level(),
            experience_fraction: ledger.experience_fraction(),
            level: ledger.level(),
            skill_points: ledger.skill_points(),
            weather: env.weather_name().to_string(),
            time: env.time_string(),
            healing_progress: ledger.healing_progress(),
            meditating: self.snapshot.meditating,
            banner: self.banner.map(|(level, _)| level),
        }
    }

    /// Current sun, moon, and sky
    pub fn lighting(&self) -> Lighting {
        let env = self.environment.borrow();
        Lighting {
            sun_position: env.day_night.sun_position(),
            moon_position: env.day_night.moon_position(),
            ambient_intensity: env.day_night.ambient_intensity(),
            sky_color: env.sky_color(),
        }
    }

    /// Spend a skill point chosen in the UI
    pub fn spend_skill_point(&mut self, skill: &str) -> Result<u32, SkillError> {
        self.ledger.borrow_mut().spend_skill_point(skill)
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn ledger(&self) -> Ref<'_, ProgressionLedger> {
        self.ledger.borrow()
    }

    pub fn ledger_mut(&self) -> RefMut<'_, ProgressionLedger> {
        self.ledger.borrow_mut()
    }

    pub fn zones(&self) -> &ProximityTriggerEngine {
        &self.zones
    }

    pub fn environment(&self) -> Ref<'_, Environment> {
        self.environment.borrow()
    }

    pub fn environment_mut(&self) -> RefMut<'_, Environment> {
        self.environment.borrow_mut()
    }

    /// Shared handle for the renderer's instanced vegetation pass
    pub fn vegetation(&self) -> Shared<VegetationField> {
        self.vegetation.clone()
    }

    pub fn flowers(&self) -> Ref<'_, FlowerBed> {
        self.flowers.borrow()
    }

    pub fn quests(&self) -> Ref<'_, QuestLog> {
        self.quests.borrow()
    }

    pub fn npcs(&self) -> Ref<'_, NpcCrowd> {
        self.npcs.borrow()
    }

    pub fn particles(&self) -> Ref<'_, ParticleEffects> {
        self.particles.borrow()
    }

    pub fn ground(&self) -> GroundSample {
        *self.ground.borrow()
    }

    pub fn scheduler(&self) -> &SubsystemScheduler {
        &self.scheduler
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Handle of the level-up burst currently playing, if any
    pub fn active_burst(&self) -> Option<EntityId> {
        self.particles.borrow().bursts().last().map(|b| b.handle)
    }
}
