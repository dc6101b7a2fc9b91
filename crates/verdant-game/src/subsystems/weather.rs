//! Weather changes and lightning

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use verdant_world::Environment;

use crate::events::{GameEvent, SceneCommand, WorldEvent};
use crate::subsystem::{borrow_state, Shared, Subsystem, SubsystemError, TickContext};

/// Rolls the weather on a repeating timer and strikes lightning during storms
pub struct WeatherCycle {
    environment: Shared<Environment>,
    rng: StdRng,
}

impl WeatherCycle {
    pub fn new(environment: Shared<Environment>, seed: u64) -> Self {
        Self {
            environment,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Subsystem for WeatherCycle {
    fn name(&self) -> &str {
        "weather"
    }

    fn initialize(&mut self, ctx: &mut TickContext) -> Result<(), SubsystemError> {
        let env = borrow_state(&self.environment, "environment")?;
        let interval = env.weather.config.change_interval;
        ctx.commands
            .push(SceneCommand::SetWeatherVisuals(env.weather.visuals()));
        drop(env);

        ctx.schedule_every(interval, WorldEvent::WeatherChange);
        Ok(())
    }

    fn update(&mut self, ctx: &mut TickContext) -> Result<(), SubsystemError> {
        let mut env = borrow_state(&self.environment, "environment")?;
        if !env.weather.should_strike(ctx.delta(), &mut self.rng) {
            return Ok(());
        }

        env.weather.begin_flash();
        let duration = env.weather.config.flash_duration;
        drop(env);

        ctx.commands.push(SceneCommand::ShowLightning);
        ctx.schedule_after(duration, WorldEvent::EndLightningFlash);
        Ok(())
    }

    fn handle_event(
        &mut self,
        event: &WorldEvent,
        ctx: &mut TickContext,
    ) -> Result<(), SubsystemError> {
        let mut env = borrow_state(&self.environment, "environment")?;
        match event {
            WorldEvent::WeatherChange => {
                let previous = env.weather.current();
                let next = env.weather.roll(&mut self.rng);
                if next == previous {
                    return Ok(());
                }

                info!(from = previous.name(), to = next.name(), "Weather changed");
                ctx.commands
                    .push(SceneCommand::SetWeatherVisuals(env.weather.visuals()));
                ctx.events.push(GameEvent::WeatherChanged { state: next });

                if !env.weather.visuals().lightning && env.weather.end_flash() {
                    ctx.commands.push(SceneCommand::HideLightning);
                }
            }
            WorldEvent::EndLightningFlash => {
                if env.weather.end_flash() {
                    ctx.commands.push(SceneCommand::HideLightning);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use verdant_world::WeatherState;

    use super::*;
    use crate::subsystem::shared;
    use crate::subsystems::testing::Harness;

    #[test]
    fn test_initialize_schedules_change() {
        let env = shared(Environment::default());
        let mut weather = WeatherCycle::new(env, 1);
        let mut harness = Harness::new();

        weather.initialize(&mut harness.ctx()).unwrap();
        assert_eq!(harness.timers.len(), 1);
        assert!(matches!(
            harness.commands[0],
            SceneCommand::SetWeatherVisuals(_)
        ));
        assert!(harness.advance(0.25).is_empty());
        assert_eq!(harness.timers.drain_due(30.5), vec![WorldEvent::WeatherChange]);
    }

    #[test]
    fn test_change_reports_new_state() {
        let env = shared(Environment::default());
        let mut weather = WeatherCycle::new(env.clone(), 42);
        let mut harness = Harness::new();

        for _ in 0..20 {
            let before = env.borrow().weather.current();
            weather
                .handle_event(&WorldEvent::WeatherChange, &mut harness.ctx())
                .unwrap();
            let after = env.borrow().weather.current();
            let announced = harness
                .events
                .iter()
                .any(|e| *e == GameEvent::WeatherChanged { state: after });
            assert_eq!(announced, before != after);
            harness.events.clear();
        }
    }

    #[test]
    fn test_storm_flash_cleared_by_timer() {
        let env = shared(Environment::default());
        env.borrow_mut().weather.set_state(WeatherState::Stormy);
        env.borrow_mut().weather.config.lightning_rate = 1000.0;
        let mut weather = WeatherCycle::new(env.clone(), 7);
        let mut harness = Harness::new();

        harness.advance(0.016);
        weather.update(&mut harness.ctx()).unwrap();
        assert!(env.borrow().weather.flash_active());
        assert_eq!(harness.commands, vec![SceneCommand::ShowLightning]);

        // Only one flash at a time
        weather.update(&mut harness.ctx()).unwrap();
        assert_eq!(harness.timers.len(), 1);

        let due = harness.advance(0.2);
        assert_eq!(due, vec![WorldEvent::EndLightningFlash]);
        weather.handle_event(&due[0], &mut harness.ctx()).unwrap();
        assert!(!env.borrow().weather.flash_active());
        assert_eq!(harness.commands.last(), Some(&SceneCommand::HideLightning));
    }

    #[test]
    fn test_busy_state_is_an_error() {
        let env = shared(Environment::default());
        let mut weather = WeatherCycle::new(env.clone(), 7);
        let mut harness = Harness::new();

        let _held = env.borrow_mut();
        assert!(matches!(
            weather.update(&mut harness.ctx()),
            Err(SubsystemError::StateBusy("environment"))
        ));
    }
}
