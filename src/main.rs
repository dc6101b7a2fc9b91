//! Verdant - headless runner for the world simulation
//!
//! Loads settings, builds a world, and walks the player between zones for a
//! fixed number of frames, logging the HUD and gameplay events.

mod autopilot;
mod settings;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;
use verdant_game::{Frame, FrameSink, GameEvent, SceneCommand, World};

use crate::autopilot::Autopilot;
use crate::settings::Settings;

/// Frame sink that logs instead of drawing
struct LogSink {
    hud_interval: u64,
    commands: usize,
    events: usize,
}

impl FrameSink for LogSink {
    fn render(&mut self, frame: &Frame) {
        self.commands += frame.commands.len();
        self.events += frame.events.len();

        for command in frame.commands {
            if let SceneCommand::ShowLevelUpBanner { level } = command {
                info!("*** LEVEL {} ***", level);
            }
        }
        for event in frame.events {
            match event {
                GameEvent::LevelUp { .. } => {}
                GameEvent::QuestCompleted { title, .. } => info!("Quest completed: {}", title),
                GameEvent::SkillUnlocked { name } => info!("New skill: {}", name),
                GameEvent::WeatherChanged { state } => info!("The weather turns {}", state.name()),
                other => debug!(?other, "Game event"),
            }
        }

        if self.hud_interval > 0 && frame.tick % self.hud_interval == 0 {
            let hud = &frame.hud;
            info!(
                "[{}] {} | HP {:.1} | EN {:.1} | LV {} ({:.0}%) | SP {} | heal {:.0}%{}",
                hud.time,
                hud.weather,
                hud.health,
                hud.energy,
                hud.level,
                hud.experience_fraction * 100.0,
                hud.skill_points,
                hud.healing_progress * 100.0,
                if hud.meditating { " | meditating" } else { "" },
            );
        }
    }
}

fn main() -> Result<()> {
    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let (settings, outcome) = match &settings_path {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let level = Level::from_str(&settings.session.log_level)
        .with_context(|| format!("Invalid log level {:?}", settings.session.log_level))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Starting Verdant...");
    outcome.log();

    if settings.session.write_defaults
        && settings_path.is_none()
        && Settings::settings_path().is_some_and(|p| !p.exists())
    {
        settings.save().context("Failed to write default settings")?;
    }

    let session = settings.session.clone();
    let mut world = World::new(settings.world);
    let mut autopilot = Autopilot::default();
    let mut sink = LogSink {
        hud_interval: session.hud_interval,
        commands: 0,
        events: 0,
    };

    let delta = session.frame_delta();
    let mut failures = 0;
    for _ in 0..session.ticks {
        let input = autopilot.steer(&world);
        let report = world.tick(delta, &input, &mut sink);
        failures += report.scheduler.failures.len();
    }

    let ledger = world.ledger();
    info!(
        frames = session.ticks,
        seconds = world.clock().elapsed(),
        level = ledger.level(),
        experience = ledger.experience(),
        flowers_left = world.flowers().alive_count(),
        quests_done = world.quests().completed().len(),
        scene_commands = sink.commands,
        game_events = sink.events,
        subsystem_failures = failures,
        "Session finished"
    );
    drop(ledger);

    world.stop();
    Ok(())
}
