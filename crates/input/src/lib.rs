//! Input mapped to actions, and actions mapped to a movement intent.
//!
//! # Invariants
//! - Simulation code consumes [`Action`]s and [`MoveInput`], never raw key codes.
//! - Opposing directions cancel; each axis of a [`MoveInput`] is -1, 0 or 1.

pub mod action;
pub mod state;

pub use action::{Action, UnknownAction};
pub use state::{InputState, MoveInput};
