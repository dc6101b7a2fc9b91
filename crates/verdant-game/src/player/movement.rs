//! Movement configuration and constants

use serde::{Deserialize, Serialize};

/// Movement configuration, in per-tick units
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Distance moved per tick along each held axis
    pub move_speed: f32,
    /// Vertical velocity set by a jump
    pub jump_velocity: f32,
    /// Vertical velocity lost per tick
    pub gravity: f32,
    /// Height of the ground plane the player lands on
    pub ground_height: f32,
    /// Half-size of the square the player is kept inside
    pub bounds: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.15,
            jump_velocity: 0.3,
            gravity: 0.01,
            ground_height: 0.0,
            bounds: 40.0,
        }
    }
}

impl MovementConfig {
    /// Clamp a horizontal coordinate to the play area
    ///
    /// Negative or NaN bounds collapse the play area to the origin.
    pub fn clamp_to_bounds(&self, value: f32) -> f32 {
        let bounds = self.bounds.max(0.0);
        value.clamp(-bounds, bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_bounds() {
        let config = MovementConfig::default();
        assert_eq!(config.clamp_to_bounds(55.0), 40.0);
        assert_eq!(config.clamp_to_bounds(-55.0), -40.0);
        assert_eq!(config.clamp_to_bounds(12.5), 12.5);
    }

    #[test]
    fn test_bad_bounds_collapse_to_origin() {
        let mut config = MovementConfig {
            bounds: -5.0,
            ..Default::default()
        };
        assert_eq!(config.clamp_to_bounds(3.0), 0.0);

        config.bounds = f32::NAN;
        assert_eq!(config.clamp_to_bounds(-3.0), 0.0);
    }
}
