//! Focus timer for the town.
//!
//! [`PomodoroTimer`] runs one phase at a time (work, short break or long
//! break) on simulated seconds fed through [`PomodoroTimer::update`].
//!
//! # Invariants
//!
//! - Only a running phase advances; a paused phase keeps its elapsed time.
//! - The completed-session count only grows, and only when a work phase runs
//!   to its end. Stopping early never counts.
//! - A long break is suggested after every `long_break_interval` completed
//!   work sessions.
//! - Phase endings are queued as [`PomodoroEvent`]s and stay queued until the
//!   caller drains them.

pub mod config;
pub mod timer;

pub use config::PomodoroConfig;
pub use timer::{FocusStats, Phase, PomodoroEvent, PomodoroTimer, TimerState};
