//! Session owner and headless driver for the focus town.
//!
//! # Invariants
//! - One [`Session`] owns every subsystem; nothing holds a reference into
//!   another subsystem between frames.
//! - Progression events are mirrored onto the town in the frame they are
//!   raised, so a save never sees a building level the engine disagrees with.

pub mod config;
pub mod script;
pub mod session;

pub use config::{AppConfig, ConfigError};
pub use script::{Step, StepError};
pub use session::{Session, SessionEvent, interior_scene};
