//! Day/night stepping

use tracing::debug;
use verdant_world::Environment;

use crate::events::WorldEvent;
use crate::subsystem::{borrow_state, Shared, Subsystem, SubsystemError, TickContext};

/// Advances the time of day on a repeating timer
pub struct DayNightCycle {
    environment: Shared<Environment>,
    last_band: Option<&'static str>,
}

impl DayNightCycle {
    pub fn new(environment: Shared<Environment>) -> Self {
        Self {
            environment,
            last_band: None,
        }
    }
}

impl Subsystem for DayNightCycle {
    fn name(&self) -> &str {
        "day-night"
    }

    fn initialize(&mut self, ctx: &mut TickContext) -> Result<(), SubsystemError> {
        let env = borrow_state(&self.environment, "environment")?;
        let interval = env.day_night.config.step_interval;
        self.last_band = Some(env.day_night.sky_band().name());
        drop(env);

        ctx.schedule_every(interval, WorldEvent::DayNightStep);
        Ok(())
    }

    fn update(&mut self, _ctx: &mut TickContext) -> Result<(), SubsystemError> {
        Ok(())
    }

    fn handle_event(
        &mut self,
        event: &WorldEvent,
        _ctx: &mut TickContext,
    ) -> Result<(), SubsystemError> {
        if *event != WorldEvent::DayNightStep {
            return Ok(());
        }

        let mut env = borrow_state(&self.environment, "environment")?;
        env.day_night.step();

        let band = env.day_night.sky_band().name();
        if self.last_band != Some(band) {
            debug!(band, time = %env.day_night.formatted_time(), "Sky band changed");
            self.last_band = Some(band);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsystem::shared;
    use crate::subsystems::testing::Harness;

    #[test]
    fn test_steps_on_timer() {
        let env = shared(Environment::default());
        let start = env.borrow().day_night.time_of_day();
        let mut cycle = DayNightCycle::new(env.clone());
        let mut harness = Harness::new();
        cycle.initialize(&mut harness.ctx()).unwrap();

        let mut steps = 0;
        for _ in 0..250 {
            for event in harness.advance(0.02) {
                cycle.handle_event(&event, &mut harness.ctx()).unwrap();
                steps += 1;
            }
        }
        // 5 simulated seconds, one step per second
        assert!((4..=5).contains(&steps));

        let expected = (start + steps as f32 / 120.0).fract();
        assert!((env.borrow().day_night.time_of_day() - expected).abs() < 1e-4);
    }

    #[test]
    fn test_ignores_other_events() {
        let env = shared(Environment::default());
        let before = env.borrow().day_night.time_of_day();
        let mut cycle = DayNightCycle::new(env.clone());
        let mut harness = Harness::new();

        cycle
            .handle_event(&WorldEvent::WeatherChange, &mut harness.ctx())
            .unwrap();
        assert_eq!(env.borrow().day_night.time_of_day(), before);
    }
}
