use focustown_common::wire::xy;
use focustown_common::{CharacterState, Direction};
use glam::Vec2;
use serde::{Deserialize, Serialize};

const BASE_EXPERIENCE_PER_LEVEL: f32 = 100.0;
const EXPERIENCE_MULTIPLIER: f32 = 1.5;

/// The player's avatar: where it stands, which way it faces, and its personal level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub name: String,
    #[serde(with = "xy")]
    pub position: Vec2,
    #[serde(default)]
    pub facing: Direction,
    #[serde(default)]
    pub state: CharacterState,
    #[serde(default = "first_level")]
    pub level: u32,
    #[serde(default)]
    pub experience: u32,
    #[serde(default = "default_speed")]
    pub movement_speed: f32,
}

fn first_level() -> u32 {
    1
}

fn default_speed() -> f32 {
    100.0
}

impl Character {
    /// Collision box of the character, anchored at its position.
    pub const SIZE: Vec2 = Vec2::new(32.0, 32.0);

    pub fn new(name: impl Into<String>, position: Vec2) -> Self {
        Self {
            name: name.into(),
            position,
            facing: Direction::default(),
            state: CharacterState::Idle,
            level: 1,
            experience: 0,
            movement_speed: default_speed(),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.state == CharacterState::Walking
    }

    pub fn is_idle(&self) -> bool {
        self.state == CharacterState::Idle
    }

    /// Total experience needed to reach `target` from level 1.
    ///
    /// Each step costs `100 * 1.5^(n-2)` for level n, truncated.
    pub fn experience_for_level(target: u32) -> u32 {
        (2..=target)
            .map(|n| (BASE_EXPERIENCE_PER_LEVEL * EXPERIENCE_MULTIPLIER.powi(n as i32 - 2)) as u32)
            .sum()
    }

    pub fn experience_to_next_level(&self) -> u32 {
        Self::experience_for_level(self.level + 1).saturating_sub(self.experience)
    }

    /// Add experience and apply every level-up it pays for. Returns levels gained.
    pub fn add_experience(&mut self, points: u32) -> u32 {
        if points == 0 {
            return 0;
        }
        self.experience = self.experience.saturating_add(points);
        let before = self.level;
        while self.experience >= Self::experience_for_level(self.level + 1) {
            self.level += 1;
        }
        if self.level > before {
            tracing::debug!(level = self.level, "character levelled up");
        }
        self.level - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_curve() {
        assert_eq!(Character::experience_for_level(1), 0);
        assert_eq!(Character::experience_for_level(2), 100);
        assert_eq!(Character::experience_for_level(3), 250);
        assert_eq!(Character::experience_for_level(4), 475);
    }

    #[test]
    fn add_experience_levels_through() {
        let mut c = Character::new("Player", Vec2::ZERO);
        assert_eq!(c.add_experience(0), 0);
        assert_eq!(c.add_experience(260), 2);
        assert_eq!(c.level, 3);
        assert_eq!(c.experience_to_next_level(), 215);
    }

    #[test]
    fn character_json_defaults() {
        let c: Character =
            serde_json::from_str(r#"{"name":"Ada","position":{"x":5,"y":6}}"#).unwrap();
        assert_eq!(c.position, Vec2::new(5.0, 6.0));
        assert_eq!(c.level, 1);
        assert_eq!(c.movement_speed, 100.0);
        assert!(c.is_idle());
    }
}
