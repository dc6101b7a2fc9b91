//! Scripted player for headless sessions
//!
//! Walks to the nearest flower, and rests in the nearest meditation zone
//! whenever energy or health runs low.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use verdant_game::zone::horizontal_distance;
use verdant_game::{PlayerInput, World, ZoneKind};

/// Energy below which the autopilot goes to meditate
const REST_BELOW: f32 = 40.0;
/// Energy at which it leaves the meditation zone again
const RESTED_AT: f32 = 90.0;

#[derive(Debug, Default)]
pub struct Autopilot {
    resting: bool,
}

impl Autopilot {
    /// Input for the next frame
    pub fn steer(&mut self, world: &World) -> PlayerInput {
        let (energy, health) = {
            let ledger = world.ledger();
            (ledger.energy(), ledger.health())
        };
        if energy < REST_BELOW || health < REST_BELOW {
            self.resting = true;
        } else if energy >= RESTED_AT && health >= RESTED_AT {
            self.resting = false;
        }

        let player = world.player();
        let wanted = if self.resting {
            ZoneKind::Meditation
        } else {
            ZoneKind::Collectible
        };

        let target = world
            .zones()
            .zones()
            .iter()
            .filter(|zone| zone.kind == wanted)
            .min_by(|a, b| {
                horizontal_distance(player.position, a.position)
                    .total_cmp(&horizontal_distance(player.position, b.position))
            });

        let Some(target) = target else {
            return PlayerInput::default();
        };

        // Stand still once inside a zone we want to stay in
        let distance = horizontal_distance(player.position, target.position);
        if self.resting && distance < target.radius * 0.5 {
            return PlayerInput::default();
        }

        PlayerInput {
            direction: Vec2::new(0.0, 1.0),
            jump: false,
            yaw_delta: turn_towards(player.facing, player.position, target.position),
        }
    }
}

/// Yaw change that points the player at `target`
fn turn_towards(facing: f32, from: Vec3, to: Vec3) -> f32 {
    let offset = to - from;
    let desired = (-offset.x).atan2(-offset.z);
    (desired - facing + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_game::PlayerState;

    #[test]
    fn test_turn_towards_faces_target() {
        for target in [
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(-3.0, 0.0, 4.0),
            Vec3::new(0.0, 0.0, -2.0),
        ] {
            let mut player = PlayerState::default();
            player.facing = 1.0;
            player.facing += turn_towards(player.facing, Vec3::ZERO, target);
            let direction = Vec3::new(target.x, 0.0, target.z).normalize();
            assert!(player.forward().distance(direction) < 1e-4);
        }
    }

    #[test]
    fn test_turn_is_shortest() {
        let turn = turn_towards(3.0, Vec3::ZERO, Vec3::new(0.1, 0.0, 1.0));
        assert!(turn.abs() <= PI);
    }
}
