use serde::{Deserialize, Serialize};

/// Tuning knobs for player locomotion. Speeds are in units per second,
/// rates in units per second squared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub base_speed: f32,
    pub run_speed_multiplier: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub max_velocity: f32,
    pub enable_running: bool,
    pub enable_smoothing: bool,
    pub enable_collision_sliding: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            base_speed: 150.0,
            run_speed_multiplier: 1.5,
            acceleration: 800.0,
            deceleration: 1200.0,
            max_velocity: 300.0,
            enable_running: true,
            enable_smoothing: true,
            enable_collision_sliding: true,
        }
    }
}

impl MovementConfig {
    /// Clamp speeds and the ceiling to be non-negative.
    ///
    /// Acceleration and deceleration are left alone: a non-positive rate
    /// means "snap instantly" and is handled where the rate is applied.
    pub fn sanitized(mut self) -> Self {
        self.base_speed = self.base_speed.max(0.0);
        self.run_speed_multiplier = self.run_speed_multiplier.max(0.0);
        self.max_velocity = self.max_velocity.max(0.0);
        self
    }
}
