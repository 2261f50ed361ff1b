use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A high-level action the player can hold or press.
///
/// The platform layer maps keys to actions; everything downstream sees
/// only actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    /// Run modifier, held together with a direction.
    Run,
    /// Enter a building or use whatever is in range.
    Interact,
    /// Leave the current interior.
    Exit,
    /// Bound to nothing.
    Noop,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Run,
        Action::Interact,
        Action::Exit,
        Action::Noop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::MoveUp => "up",
            Action::MoveDown => "down",
            Action::MoveLeft => "left",
            Action::MoveRight => "right",
            Action::Run => "run",
            Action::Interact => "interact",
            Action::Exit => "exit",
            Action::Noop => "noop",
        }
    }

    pub fn is_movement(self) -> bool {
        matches!(
            self,
            Action::MoveUp | Action::MoveDown | Action::MoveLeft | Action::MoveRight
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action {0:?}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    /// Accepts the short names plus single-letter WASD/X/E aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let action = match lower.as_str() {
            "w" => Action::MoveUp,
            "s" => Action::MoveDown,
            "a" => Action::MoveLeft,
            "d" => Action::MoveRight,
            "x" => Action::Interact,
            "e" => Action::Exit,
            other => Action::ALL
                .into_iter()
                .find(|a| a.name() == other)
                .ok_or_else(|| UnknownAction(s.to_string()))?,
        };
        Ok(action)
    }
}
