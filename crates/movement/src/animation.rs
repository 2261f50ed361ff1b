use focustown_common::{CharacterState, Direction};

/// Named-clip playback owned by the presentation layer. Frame timing stays
/// with the implementor; callers only choose the clip.
pub trait AnimationPlayer {
    fn play_animation(&mut self, name: &str);
    fn update(&mut self, dt: f32);
    fn has_animation(&self, name: &str) -> bool;
}

pub const IDLE_CLIP: &str = "idle";

/// Clip name for a locomotion state: `"idle"` or `"walk_<direction>"`.
pub fn clip_for(state: CharacterState, facing: Direction) -> &'static str {
    if state != CharacterState::Walking {
        return IDLE_CLIP;
    }
    match facing {
        Direction::Up => "walk_up",
        Direction::Down => "walk_down",
        Direction::Left => "walk_left",
        Direction::Right => "walk_right",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walking_uses_facing() {
        assert_eq!(
            clip_for(CharacterState::Walking, Direction::Left),
            "walk_left"
        );
        assert_eq!(clip_for(CharacterState::Idle, Direction::Left), "idle");
        assert_eq!(clip_for(CharacterState::Focused, Direction::Up), "idle");
    }
}
