//! Scripted input for headless runs.
//!
//! A step is `action[+action...][:frames]`, e.g. `up:20`, `right+run:10` or
//! `interact`. Its actions are held for `frames` frames (default 1) and
//! released afterwards.

use focustown_input::{Action, UnknownAction};
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Action(#[from] UnknownAction),
    #[error("bad frame count {0:?}")]
    Frames(String),
    #[error("empty step")]
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub actions: Vec<Action>,
    pub frames: u32,
}

impl FromStr for Step {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (keys, frames) = match s.split_once(':') {
            Some((keys, n)) => {
                let frames = n
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| StepError::Frames(n.to_string()))?;
                (keys, frames)
            }
            None => (s, 1),
        };
        if keys.trim().is_empty() {
            return Err(StepError::Empty);
        }
        let actions = keys
            .split('+')
            .map(str::parse)
            .collect::<Result<Vec<Action>, _>>()?;
        Ok(Step { actions, frames })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_steps() {
        assert_eq!(
            "right+run:10".parse::<Step>().unwrap(),
            Step {
                actions: vec![Action::MoveRight, Action::Run],
                frames: 10,
            }
        );
        assert_eq!("x".parse::<Step>().unwrap().actions, vec![Action::Interact]);
        assert_eq!("x".parse::<Step>().unwrap().frames, 1);
        assert_eq!("noop:0".parse::<Step>().unwrap().frames, 0);
    }

    #[test]
    fn rejects_bad_steps() {
        assert!(matches!("fly:3".parse::<Step>(), Err(StepError::Action(_))));
        assert!(matches!("up:many".parse::<Step>(), Err(StepError::Frames(_))));
        assert!(matches!(":4".parse::<Step>(), Err(StepError::Empty)));
    }
}
