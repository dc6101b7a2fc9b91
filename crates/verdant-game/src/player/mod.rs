//! Player kinematics
//!
//! Position, facing, and jumping. Stats live in the progression ledger.

mod movement;

use glam::{Vec2, Vec3};

pub use movement::MovementConfig;

/// Input sampled by the render collaborator for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// x strafes right, y walks forward; each axis in -1.0..=1.0
    pub direction: Vec2,
    pub jump: bool,
    /// Change in facing, in radians
    pub yaw_delta: f32,
}

impl PlayerInput {
    pub fn walk(direction: Vec2) -> Self {
        Self {
            direction,
            ..Default::default()
        }
    }
}

/// Kinematic state of the player avatar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    pub position: Vec3,
    /// Facing angle in radians; 0 looks down -Z
    pub facing: f32,
    pub vertical_velocity: f32,
    pub grounded: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            facing: 0.0,
            vertical_velocity: 0.0,
            grounded: true,
        }
    }
}

impl PlayerState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Unit vector the player faces, on the ground plane
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.facing.sin(), 0.0, -self.facing.cos())
    }

    /// Unit vector to the player's right
    pub fn right(&self) -> Vec3 {
        let forward = self.forward();
        Vec3::new(-forward.z, 0.0, forward.x)
    }

    /// Advance one tick
    pub fn step(&mut self, input: &PlayerInput, config: &MovementConfig) {
        self.facing += input.yaw_delta;

        let strafe = input.direction.x.clamp(-1.0, 1.0);
        let walk = input.direction.y.clamp(-1.0, 1.0);
        let displacement = (self.forward() * walk + self.right() * strafe) * config.move_speed;
        self.position += displacement;

        if input.jump && self.grounded {
            self.vertical_velocity = config.jump_velocity;
            self.grounded = false;
        }

        self.vertical_velocity -= config.gravity;
        self.position.y += self.vertical_velocity;

        if self.position.y < config.ground_height {
            self.position.y = config.ground_height;
            self.vertical_velocity = 0.0;
            self.grounded = true;
        }

        self.position.x = config.clamp_to_bounds(self.position.x);
        self.position.z = config.clamp_to_bounds(self.position.z);
    }
}
