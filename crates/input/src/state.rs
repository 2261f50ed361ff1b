use crate::action::Action;
use focustown_common::Direction;
use glam::Vec2;
use std::collections::BTreeSet;

/// What the player wants to do with their feet this frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveInput {
    /// Raw direction, each axis in `{-1, 0, 1}`. Not normalised.
    pub direction: Vec2,
    pub run: bool,
}

impl MoveInput {
    pub fn is_idle(&self) -> bool {
        self.direction == Vec2::ZERO
    }

    /// Facing the direction would produce, if any.
    pub fn facing(&self) -> Option<Direction> {
        (!self.is_idle()).then(|| Direction::dominant(self.direction))
    }
}

/// Held actions plus the ones that went down since the last frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: BTreeSet<Action>,
    pressed: BTreeSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        if action == Action::Noop {
            return;
        }
        if self.held.insert(action) {
            tracing::trace!(action = action.name(), "pressed");
            self.pressed.insert(action);
        }
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Went down since the last [`end_frame`](Self::end_frame).
    pub fn was_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Forget this frame's presses; held actions stay held.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    pub fn move_input(&self) -> MoveInput {
        let axis = |neg: Action, pos: Action| -> f32 {
            let mut v = 0.0;
            if self.is_held(neg) {
                v -= 1.0;
            }
            if self.is_held(pos) {
                v += 1.0;
            }
            v
        };
        MoveInput {
            direction: Vec2::new(
                axis(Action::MoveLeft, Action::MoveRight),
                axis(Action::MoveUp, Action::MoveDown),
            ),
            run: self.is_held(Action::Run),
        }
    }
}
